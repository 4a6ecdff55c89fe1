use crate::{ItemSizes, Pool, RenderTarget, SlotId};

/// What a [`Pool::render`] pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Slots whose content was (re)written by the update callback.
    pub updated: usize,
    /// Slots that received a new translate.
    pub positioned: usize,
}

impl<E: RenderTarget> Pool<E> {
    /// Fills and positions every visible slot.
    ///
    /// `update(target, index)` runs only for slots whose content is stale (new assignment or
    /// invalidated data) and always before the slot is positioned. Each visible slot is then
    /// translated to the start offset of its index. Hidden slots are skipped entirely.
    pub fn render(
        &mut self,
        sizes: &ItemSizes,
        mut update: impl FnMut(SlotId, &mut E, usize),
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        for pos in 0..self.order().len() {
            let id = self.order()[pos];
            if !self.is_visible(id) {
                continue;
            }
            let Some(index) = self.slot(id).and_then(|s| s.assigned_index()) else {
                continue;
            };
            if self.slot(id).is_some_and(|s| s.is_stale()) {
                if let Some(target) = self.target_mut(id) {
                    update(id, target, index);
                }
                self.mark_fresh(id);
                stats.updated += 1;
            }
            if self.position(id, sizes.start_of(index)) {
                stats.positioned += 1;
            }
        }
        vtrace!(
            updated = stats.updated,
            positioned = stats.positioned,
            "Pool::render"
        );
        stats
    }
}
