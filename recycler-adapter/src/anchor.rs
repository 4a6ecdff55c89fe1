use recycler::{ItemSizes, ViewportState, max_scroll_offset, visible_range};

/// A scroll anchor that keeps an item visually still across relayout.
///
/// When items above the viewport are measured and turn out larger or smaller than estimated,
/// re-applying the anchor moves the scroll offset by the same amount, so the content under the
/// user's eyes does not jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    /// The distance from the anchor item's start to the top of the viewport.
    pub offset_in_item: u64,
}

/// Captures an anchor on the first visible item.
///
/// Returns `None` when nothing is visible.
pub fn capture_first_visible_anchor(
    sizes: &ItemSizes,
    viewport: &ViewportState,
) -> Option<ScrollAnchor> {
    let visible = visible_range(viewport, sizes);
    if visible.is_empty() {
        return None;
    }
    let index = visible.start_index;
    let offset = viewport
        .list_offset()
        .min(max_scroll_offset(sizes, viewport.viewport_height));
    Some(ScrollAnchor {
        index,
        offset_in_item: offset.saturating_sub(sizes.start_of(index)),
    })
}

/// The list-space scroll offset that puts `anchor` back where it was captured.
///
/// Returns `None` when the anchored item no longer exists.
pub fn anchored_offset(
    sizes: &ItemSizes,
    viewport: &ViewportState,
    anchor: &ScrollAnchor,
) -> Option<u64> {
    if anchor.index >= sizes.count() {
        return None;
    }
    let target = sizes
        .start_of(anchor.index)
        .saturating_add(anchor.offset_in_item);
    Some(target.min(max_scroll_offset(sizes, viewport.viewport_height)))
}
