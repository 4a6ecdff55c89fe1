use crate::{Align, VirtualRange};

/// The capability a virtualized list exposes to whatever owns its events.
///
/// The owner pushes changes in (size, scroll requests) and calls [`WindowedList::recompute`]
/// when geometry may have changed; nothing is observed implicitly.
pub trait WindowedList {
    /// Logical number of items.
    fn size(&self) -> usize;

    /// Sets the logical number of items and re-renders.
    fn set_size(&mut self, size: usize);

    /// Scrolls so `index` (clamped to the last item) starts at the top of the viewport.
    fn scroll_to_index(&mut self, index: usize) {
        self.scroll_to_index_aligned(index, Align::Start);
    }

    fn scroll_to_index_aligned(&mut self, index: usize, align: Align);

    /// Re-measures the viewport and re-renders the window.
    fn recompute(&mut self);

    /// Runs all deferred work synchronously.
    fn flush(&mut self);

    /// Indexes currently intersecting the viewport.
    fn visible_range(&self) -> VirtualRange;
}
