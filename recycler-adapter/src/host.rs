use alloc::vec::Vec;

use recycler::SlotId;

/// The container that physically hosts the slots (e.g. a DOM element).
///
/// The adapter mirrors the child order it produces, so implementations must perform the moves
/// exactly as requested.
pub trait ElementsContainer<E> {
    /// Appends `element` as the last child, moving it if already attached.
    fn append_child(&mut self, element: &E);

    /// Moves `element` right before `reference`.
    fn insert_before(&mut self, element: &E, reference: &E);

    fn remove_child(&mut self, element: &E);

    /// Starts reporting size changes of `element` (see `ListAdapter::on_element_resized`).
    fn observe_resize(&mut self, _element: &E) {}

    fn unobserve_resize(&mut self, _element: &E) {}
}

/// Secondary work requested from inside an update callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    SetSize(usize),
    ScrollToIndex(usize),
    Invalidate(usize),
    InvalidateAll,
}

/// Handed to the update callback. Collects requests that are applied on the next turn instead
/// of recursing into the adapter mid-render.
#[derive(Clone, Debug)]
pub struct UpdateContext {
    slot: SlotId,
    requests: Vec<Request>,
}

impl UpdateContext {
    pub(crate) fn new() -> Self {
        Self {
            slot: SlotId(0),
            requests: Vec::new(),
        }
    }

    pub(crate) fn set_slot(&mut self, slot: SlotId) {
        self.slot = slot;
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Request> {
        core::mem::take(&mut self.requests)
    }

    /// The slot being updated; report its size changes under this handle.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn request_size(&mut self, size: usize) {
        self.requests.push(Request::SetSize(size));
    }

    pub fn request_scroll_to_index(&mut self, index: usize) {
        self.requests.push(Request::ScrollToIndex(index));
    }

    pub fn invalidate(&mut self, index: usize) {
        self.requests.push(Request::Invalidate(index));
    }

    pub fn invalidate_all(&mut self) {
        self.requests.push(Request::InvalidateAll);
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }
}
