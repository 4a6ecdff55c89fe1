use alloc::vec::Vec;

use crate::sizes::DEFAULT_ITEM_HEIGHT;
use crate::{Align, ItemSizes, ViewportState, VirtualRange};

/// Sizing knobs for window computation and pool capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowOptions {
    /// Size assumed for items that were never measured. Zero means [`DEFAULT_ITEM_HEIGHT`].
    pub estimated_item_height: u32,
    /// Extra items materialized on each side of the visible range.
    pub overscan: usize,
    /// Hard ceiling on the number of physical slots.
    pub max_physical_count: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            estimated_item_height: DEFAULT_ITEM_HEIGHT,
            overscan: 2,
            max_physical_count: 500,
        }
    }
}

impl WindowOptions {
    pub fn with_estimated_item_height(mut self, height: u32) -> Self {
        self.estimated_item_height = height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_max_physical_count(mut self, max: usize) -> Self {
        self.max_physical_count = max.max(1);
        self
    }

    /// Number of slots needed to cover `viewport_height` with rows of `item_height`.
    ///
    /// `ceil(viewport / row) + 1` for a row cut at each edge, plus overscan on both sides.
    /// This depends only on the viewport, never on the logical size.
    pub fn capacity_for(&self, viewport_height: u32, item_height: u32) -> usize {
        let row = if item_height == 0 {
            DEFAULT_ITEM_HEIGHT
        } else {
            item_height
        };
        let rows = viewport_height.div_ceil(row) as usize;
        rows.saturating_add(1)
            .saturating_add(self.overscan.saturating_mul(2))
            .min(self.max_physical_count)
    }
}

/// The contiguous range of virtual indexes to materialize for one viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    /// Indexes intersecting the viewport.
    pub visible: VirtualRange,
    /// First materialized index (visible start minus overscan).
    pub start_index: usize,
    /// One past the last materialized index.
    pub end_index: usize,
    /// Start offset of each materialized index, `offsets[i - start_index]`.
    pub offsets: Vec<u64>,
    /// The scroll offset (list space) the window was computed for, after clamping.
    pub scroll_offset: u64,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn range(&self) -> VirtualRange {
        VirtualRange {
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }

    pub fn offset_of(&self, index: usize) -> Option<u64> {
        if index < self.start_index {
            return None;
        }
        self.offsets.get(index - self.start_index).copied()
    }
}

/// Largest scroll offset (list space) that still fills the viewport.
pub fn max_scroll_offset(sizes: &ItemSizes, viewport_height: u32) -> u64 {
    sizes.total().saturating_sub(u64::from(viewport_height))
}

/// Indexes intersecting the viewport, with the offset clamped so the last item stays fully
/// visible.
pub fn visible_range(viewport: &ViewportState, sizes: &ItemSizes) -> VirtualRange {
    let count = sizes.count();
    if count == 0 || viewport.viewport_height == 0 {
        return VirtualRange::EMPTY;
    }
    let view = u64::from(viewport.viewport_height);
    let offset = viewport
        .list_offset()
        .min(max_scroll_offset(sizes, viewport.viewport_height));
    let last_pixel = offset.saturating_add(view).saturating_sub(1);

    let (Some(first), Some(last)) = (sizes.index_at(offset), sizes.index_at(last_pixel)) else {
        return VirtualRange::EMPTY;
    };
    VirtualRange {
        start_index: first,
        end_index: last.max(first) + 1,
    }
}

/// Computes which virtual indexes should be materialized for `viewport`.
///
/// An empty list or a zero-height viewport yields an empty window.
pub fn compute_window(viewport: &ViewportState, sizes: &ItemSizes, overscan: usize) -> Window {
    let count = sizes.count();
    let visible = visible_range(viewport, sizes);
    if visible.is_empty() {
        return Window::default();
    }
    let scroll_offset = viewport
        .list_offset()
        .min(max_scroll_offset(sizes, viewport.viewport_height));
    let start_index = visible.start_index.saturating_sub(overscan);
    let end_index = visible.end_index.saturating_add(overscan).min(count);

    let mut offsets = Vec::with_capacity(end_index - start_index);
    let mut y = sizes.start_of(start_index);
    for i in start_index..end_index {
        offsets.push(y);
        y = y.saturating_add(u64::from(sizes.size_of(i).unwrap_or(0)));
    }

    vtrace!(
        scroll_offset,
        visible_start = visible.start_index,
        visible_end = visible.end_index,
        start_index,
        end_index,
        "compute_window"
    );
    Window {
        visible,
        start_index,
        end_index,
        offsets,
        scroll_offset,
    }
}

/// List-space scroll offset that brings `index` into view with `align`.
///
/// `index` is clamped to the last item; an empty list yields `0`.
pub fn scroll_offset_for_index(
    sizes: &ItemSizes,
    viewport: &ViewportState,
    index: usize,
    align: Align,
) -> u64 {
    let count = sizes.count();
    if count == 0 {
        return 0;
    }
    let index = index.min(count - 1);
    let start = sizes.start_of(index);
    let end = start.saturating_add(u64::from(sizes.size_of(index).unwrap_or(0)));
    let view = u64::from(viewport.viewport_height);

    let target = match align {
        Align::Start => start,
        Align::End => end.saturating_sub(view),
        Align::Center => {
            let center = start.saturating_add(end.saturating_sub(start) / 2);
            center.saturating_sub(view / 2)
        }
        Align::Auto => {
            let cur = viewport.list_offset();
            if start >= cur && end <= cur.saturating_add(view) {
                cur
            } else if start < cur {
                start
            } else {
                end.saturating_sub(view)
            }
        }
    };
    target.min(max_scroll_offset(sizes, viewport.viewport_height))
}
