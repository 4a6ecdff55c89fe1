use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use recycler::{
    Align, Debouncer, ItemSizes, Pool, RenderTarget, Reorder, ScrollTarget, SlotId,
    ViewportState, ViewportTracker, VirtualRange, Window, WindowedList, compute_window,
    scroll_offset_for_index,
};

use crate::anchor::{anchored_offset, capture_first_visible_anchor};
use crate::options::{CreateElements, UpdateElement};
use crate::{AdapterOptions, ConfigError, ElementsContainer, Request, UpdateContext};

/// A virtualized list over host render targets.
///
/// Owns a bounded pool of `E` targets inside container `C`, scrolled by `S`. The host forwards
/// its events:
/// - `on_scroll(now_ms)` when the scroll target scrolls
/// - `on_resize()` / `on_element_resized(slot, height)` from its resize observers
/// - `tick(now_ms)` once per event-loop turn, to run deferred work
///
/// Scroll handling is synchronous. Resize handling, requests made from the update callback,
/// and the child reorder are deferred to `tick`; `flush` runs them immediately.
pub struct ListAdapter<E, S, C> {
    options: AdapterOptions<E>,
    create_elements: CreateElements<E>,
    update_element: UpdateElement<E>,
    scroll_target: S,
    container: C,

    tracker: ViewportTracker,
    sizes: ItemSizes,
    pool: Pool<E>,
    window: Window,
    size: usize,

    reorder: Debouncer,
    reorder_runs: usize,
    now_ms: u64,
    resize_pending: bool,
    pending_measurements: Vec<(SlotId, u32)>,
    deferred: Vec<Request>,
}

impl<E, S, C> ListAdapter<E, S, C>
where
    E: RenderTarget,
    S: ScrollTarget,
    C: ElementsContainer<E>,
{
    /// Builds the adapter and creates the initial pool from the current viewport.
    pub fn new(
        options: AdapterOptions<E>,
        scroll_target: S,
        container: C,
    ) -> Result<Self, ConfigError> {
        let create_elements = options
            .create_elements
            .clone()
            .ok_or(ConfigError::MissingCreateElements)?;
        let update_element = options
            .update_element
            .clone()
            .ok_or(ConfigError::MissingUpdateElement)?;

        vdebug!(
            reorder_elements = options.reorder_elements,
            overscan = options.window.overscan,
            estimated_item_height = options.window.estimated_item_height,
            "ListAdapter::new"
        );
        let mut adapter = Self {
            sizes: ItemSizes::new(options.window.estimated_item_height),
            reorder: Debouncer::new(options.reorder_delay_ms),
            options,
            create_elements,
            update_element,
            scroll_target,
            container,
            tracker: ViewportTracker::new(),
            pool: Pool::new(),
            window: Window::default(),
            size: 0,
            reorder_runs: 0,
            now_ms: 0,
            resize_pending: false,
            pending_measurements: Vec::new(),
            deferred: Vec::new(),
        };
        adapter.recompute();
        Ok(adapter)
    }

    pub fn options(&self) -> &AdapterOptions<E> {
        &self.options
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Sets the logical size. Treated as an items change: every slot is re-rendered.
    pub fn set_size(&mut self, size: usize) {
        vdebug!(prev = self.size, size, "ListAdapter::set_size");
        self.size = size;
        self.sizes.set_count(size);
        self.pool.set_size(size);
        self.pool.invalidate_all();
        self.recompute();
        self.schedule_reorder();
    }

    pub fn set_reorder_elements(&mut self, reorder_elements: bool) {
        self.options.reorder_elements = reorder_elements;
        if !reorder_elements {
            self.reorder.cancel();
        }
    }

    pub fn pool(&self) -> &Pool<E> {
        &self.pool
    }

    pub fn sizes(&self) -> &ItemSizes {
        &self.sizes
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Last measured viewport geometry.
    pub fn viewport(&self) -> ViewportState {
        self.tracker.last()
    }

    pub fn visible_range(&self) -> VirtualRange {
        self.window.visible
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        let visible = self.window.visible;
        (!visible.is_empty()).then_some(visible.start_index)
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        let visible = self.window.visible;
        (!visible.is_empty()).then(|| visible.end_index - 1)
    }

    /// Mutable access to a slot's target, e.g. to move focus into it.
    pub fn element_mut(&mut self, slot: SlotId) -> Option<&mut E> {
        self.pool.target_mut(slot)
    }

    pub fn scroll_target(&self) -> &S {
        &self.scroll_target
    }

    pub fn scroll_target_mut(&mut self) -> &mut S {
        &mut self.scroll_target
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn is_reorder_pending(&self) -> bool {
        self.reorder.is_pending()
    }

    /// How many reorder passes have run.
    pub fn reorder_runs(&self) -> usize {
        self.reorder_runs
    }

    pub fn has_deferred_work(&self) -> bool {
        self.resize_pending || !self.deferred.is_empty()
    }

    /// Scroll event from the host. Re-renders synchronously and (re)arms the reorder.
    pub fn on_scroll(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.handle_scroll();
    }

    /// The scroll target changed size. Handled on the next turn.
    pub fn on_resize(&mut self) {
        self.resize_pending = true;
    }

    /// A slot changed size. Handled on the next turn.
    pub fn on_element_resized(&mut self, slot: SlotId, height: u32) {
        self.pending_measurements.push((slot, height));
        self.resize_pending = true;
    }

    /// Next event-loop turn: applies deferred work and fires the reorder when due.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.run_deferred();
        if self.reorder.poll(now_ms) {
            self.reorder_elements();
        }
    }

    /// Runs pending resize handling, deferred requests, and a pending reorder right now.
    pub fn flush(&mut self) {
        self.run_deferred();
        if self.reorder.flush() {
            self.reorder_elements();
        }
    }

    /// Re-measures the viewport and re-renders the window.
    pub fn recompute(&mut self) {
        let viewport = self.tracker.measure(&self.scroll_target);
        let capacity = self
            .options
            .window
            .capacity_for(viewport.viewport_height, self.sizes.typical_size());
        let mut relaid = self.grow_pool(capacity);

        let window = compute_window(&viewport, &self.sizes, self.options.window.overscan);
        if window.len() > self.pool.len() {
            let max = self.options.window.max_physical_count;
            if window.len() > max {
                vwarn!(
                    window = window.len(),
                    max,
                    "ListAdapter::recompute: window exceeds max_physical_count"
                );
            }
            relaid |= self.grow_pool(window.len().min(max));
        }

        relaid |= !self.pool.recycle(window.start_index).is_empty();
        self.window = window;
        self.render();
        if relaid {
            self.schedule_reorder();
        }
    }

    /// Scrolls so `index` is placed according to `align`, then handles the scroll.
    ///
    /// `index` is clamped to the last item. No-op on an empty list.
    pub fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        if self.size == 0 {
            return;
        }
        let viewport = self.tracker.measure(&self.scroll_target);
        let offset = scroll_offset_for_index(&self.sizes, &viewport, index, align);
        vdebug!(index, offset, "ListAdapter::scroll_to_index");
        self.write_scroll_top(&viewport, offset);
        self.handle_scroll();
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        self.scroll_to_index_aligned(index, Align::Start);
    }

    /// Re-renders the slot showing `index`, if any.
    pub fn invalidate(&mut self, index: usize) {
        self.pool.invalidate(index);
        self.render();
    }

    pub fn invalidate_all(&mut self) {
        self.pool.invalidate_all();
        self.render();
    }

    /// Shrinks the pool back to what the current viewport needs.
    ///
    /// The pool never shrinks on its own; this is the escape hatch for long-lived lists whose
    /// viewport was once much taller. Returns the number of slots removed.
    pub fn trim(&mut self) -> usize {
        let viewport = self.tracker.last();
        let keep = self
            .options
            .window
            .capacity_for(viewport.viewport_height, self.sizes.typical_size())
            .max(self.window.len());
        let removed = self.pool.trim(keep);
        for target in &removed {
            self.container.unobserve_resize(target);
            self.container.remove_child(target);
        }
        self.pending_measurements
            .retain(|(slot, _)| slot.index() < keep);
        if !removed.is_empty() {
            self.recompute();
            self.schedule_reorder();
        }
        removed.len()
    }

    /// Detaches every slot and hands the collaborators back.
    pub fn teardown(mut self) -> (S, C) {
        self.reorder.cancel();
        for target in self.pool.drain() {
            self.container.unobserve_resize(&target);
            self.container.remove_child(&target);
        }
        vdebug!("ListAdapter::teardown");
        let Self {
            scroll_target,
            container,
            ..
        } = self;
        (scroll_target, container)
    }

    /// Runs the reorder pass now and returns what it did.
    ///
    /// Children are rotated so visible slots follow virtual order, anchored on the slot holding
    /// focus (else the first visible child). If growing or trimming the pool broke the ring, the
    /// other children are placed around the anchor instead. The anchor itself never moves.
    /// Assignments and content are left alone.
    pub fn reorder_elements(&mut self) -> Reorder {
        self.reorder_runs += 1;
        let plan = self.pool.plan_reorder();
        match &plan {
            Reorder::Unchanged => {}
            Reorder::MoveToEnd(slots) => {
                for &id in slots {
                    if let Some(slot) = self.pool.slot(id) {
                        self.container.append_child(slot.target());
                    }
                }
            }
            Reorder::MoveToFront { slots, before } => {
                if let Some(reference) = self.pool.slot(*before) {
                    for &id in slots {
                        if let Some(slot) = self.pool.slot(id) {
                            self.container
                                .insert_before(slot.target(), reference.target());
                        }
                    }
                }
            }
            Reorder::Arrange {
                front,
                anchor,
                back,
            } => {
                if let Some(reference) = self.pool.slot(*anchor) {
                    for &id in front {
                        if let Some(slot) = self.pool.slot(id) {
                            self.container
                                .insert_before(slot.target(), reference.target());
                        }
                    }
                }
                for &id in back {
                    if let Some(slot) = self.pool.slot(id) {
                        self.container.append_child(slot.target());
                    }
                }
            }
        }
        self.pool.apply_reorder(&plan);
        vdebug!(
            moves = plan.moves(),
            window_start = self.pool.window_start(),
            "ListAdapter::reorder_elements"
        );
        plan
    }

    fn handle_scroll(&mut self) {
        self.recompute();
        self.schedule_reorder();
    }

    fn schedule_reorder(&mut self) {
        if self.options.reorder_elements {
            self.reorder.schedule(self.now_ms);
        }
    }

    fn write_scroll_top(&mut self, viewport: &ViewportState, list_offset: u64) {
        let scroll_top = list_offset.saturating_add(u64::from(viewport.scroller_padding_top));
        self.scroll_target.set_scroll_top(scroll_top);
        self.tracker.set_scroll_top(scroll_top);
    }

    /// Returns whether new slots were created.
    fn grow_pool(&mut self, n: usize) -> bool {
        let create = Arc::clone(&self.create_elements);
        let created = self.pool.ensure_capacity(n, |count| create(count));
        for &id in &created {
            if let Some(slot) = self.pool.slot(id) {
                self.container.append_child(slot.target());
                self.container.observe_resize(slot.target());
            }
        }
        !created.is_empty()
    }

    fn render(&mut self) {
        let update = Arc::clone(&self.update_element);
        let mut ctx = UpdateContext::new();
        self.pool.render(&self.sizes, |slot, target, index| {
            ctx.set_slot(slot);
            update(target, index, &mut ctx);
        });
        let requests = ctx.take_requests();
        if !requests.is_empty() {
            vdebug!(
                requests = requests.len(),
                "ListAdapter::render: deferring requests"
            );
            self.deferred.extend(requests);
        }
    }

    fn run_deferred(&mut self) {
        if self.resize_pending {
            self.handle_resize();
        }
        // Requests made while applying these land in `deferred` again for the next turn.
        let requests = core::mem::take(&mut self.deferred);
        let mut rerender = false;
        for request in requests {
            vtrace!(?request, "ListAdapter: applying deferred request");
            match request {
                Request::SetSize(size) => self.set_size(size),
                Request::ScrollToIndex(index) => self.scroll_to_index(index),
                Request::Invalidate(index) => {
                    self.pool.invalidate(index);
                    rerender = true;
                }
                Request::InvalidateAll => {
                    self.pool.invalidate_all();
                    rerender = true;
                }
            }
        }
        if rerender {
            self.render();
        }
    }

    fn handle_resize(&mut self) {
        self.resize_pending = false;
        let viewport = self.tracker.measure(&self.scroll_target);
        let anchor = capture_first_visible_anchor(&self.sizes, &viewport);

        let mut shifted = false;
        for (slot, height) in core::mem::take(&mut self.pending_measurements) {
            let Some(index) = self.pool.slot(slot).and_then(|s| s.assigned_index()) else {
                continue;
            };
            if index < self.size && self.sizes.measure(index, height) != 0 {
                shifted = true;
            }
        }

        if shifted {
            if let Some(target) = anchor
                .as_ref()
                .and_then(|a| anchored_offset(&self.sizes, &viewport, a))
            {
                if target != viewport.list_offset() {
                    vdebug!(
                        from = viewport.list_offset(),
                        to = target,
                        "ListAdapter::handle_resize: restoring anchor"
                    );
                    self.write_scroll_top(&viewport, target);
                }
            }
        }
        self.recompute();
    }
}

impl<E, S, C> WindowedList for ListAdapter<E, S, C>
where
    E: RenderTarget,
    S: ScrollTarget,
    C: ElementsContainer<E>,
{
    fn size(&self) -> usize {
        self.size
    }

    fn set_size(&mut self, size: usize) {
        ListAdapter::set_size(self, size);
    }

    fn scroll_to_index(&mut self, index: usize) {
        ListAdapter::scroll_to_index(self, index);
    }

    fn scroll_to_index_aligned(&mut self, index: usize, align: Align) {
        ListAdapter::scroll_to_index_aligned(self, index, align);
    }

    fn recompute(&mut self) {
        ListAdapter::recompute(self);
    }

    fn flush(&mut self) {
        ListAdapter::flush(self);
    }

    fn visible_range(&self) -> VirtualRange {
        self.window.visible
    }
}

impl<E, S, C> fmt::Debug for ListAdapter<E, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAdapter")
            .field("options", &self.options)
            .field("size", &self.size)
            .field("viewport", &self.tracker.last())
            .field("window", &self.window.range())
            .field("visible", &self.window.visible)
            .field("pool_len", &self.pool.len())
            .field("reorder_pending", &self.reorder.is_pending())
            .field("reorder_runs", &self.reorder_runs)
            .finish_non_exhaustive()
    }
}
