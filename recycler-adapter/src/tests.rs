use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use recycler::{Align, RenderTarget, Reorder, ScrollTarget, ViewportState};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_range(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + self.next_u64() % (end_exclusive - start)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FakeElement {
    id: usize,
    hidden: bool,
    y: Option<u64>,
    absolute: bool,
    focused: bool,
    content: Option<usize>,
}

impl RenderTarget for FakeElement {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn set_translate_y(&mut self, y: u64) {
        self.y = Some(y);
    }

    fn set_absolute_position(&mut self) {
        self.absolute = true;
    }

    fn contains_focus(&self) -> bool {
        self.focused
    }
}

/// Child list of a container element, by element id.
#[derive(Debug, Default)]
struct FakeDom {
    children: Vec<usize>,
    observed: Vec<usize>,
    moved: Vec<usize>,
}

impl ElementsContainer<FakeElement> for FakeDom {
    fn append_child(&mut self, element: &FakeElement) {
        if let Some(pos) = self.children.iter().position(|&c| c == element.id) {
            self.children.remove(pos);
            self.moved.push(element.id);
        }
        self.children.push(element.id);
    }

    fn insert_before(&mut self, element: &FakeElement, reference: &FakeElement) {
        if let Some(pos) = self.children.iter().position(|&c| c == element.id) {
            self.children.remove(pos);
            self.moved.push(element.id);
        }
        let at = self
            .children
            .iter()
            .position(|&c| c == reference.id)
            .expect("reference is a child");
        self.children.insert(at, element.id);
    }

    fn remove_child(&mut self, element: &FakeElement) {
        self.children.retain(|&c| c != element.id);
    }

    fn observe_resize(&mut self, element: &FakeElement) {
        self.observed.push(element.id);
    }

    fn unobserve_resize(&mut self, element: &FakeElement) {
        self.observed.retain(|&c| c != element.id);
    }
}

#[derive(Debug)]
struct FakeScroller {
    attached: bool,
    state: ViewportState,
}

impl FakeScroller {
    fn new(viewport_height: u32) -> Self {
        Self {
            attached: true,
            state: ViewportState {
                scroll_top: 0,
                viewport_height,
                scroller_padding_top: 0,
            },
        }
    }
}

impl ScrollTarget for FakeScroller {
    fn measure(&self) -> Option<ViewportState> {
        self.attached.then_some(self.state)
    }

    fn set_scroll_top(&mut self, scroll_top: u64) {
        if self.attached {
            self.state.scroll_top = scroll_top;
        }
    }
}

type Adapter = ListAdapter<FakeElement, FakeScroller, FakeDom>;

fn create_elements() -> impl Fn(usize) -> Vec<FakeElement> + Send + Sync + 'static {
    let next = Arc::new(AtomicUsize::new(0));
    move |n| {
        (0..n)
            .map(|_| FakeElement {
                id: next.fetch_add(1, Ordering::Relaxed),
                ..FakeElement::default()
            })
            .collect()
    }
}

fn options(row: u32) -> AdapterOptions<FakeElement> {
    AdapterOptions::new(create_elements(), |el: &mut FakeElement, index, _| {
        el.content = Some(index);
    })
    .with_estimated_item_height(row)
}

fn adapter(viewport_height: u32, options: AdapterOptions<FakeElement>) -> Adapter {
    ListAdapter::new(options, FakeScroller::new(viewport_height), FakeDom::default())
        .expect("valid options")
}

fn scroll(a: &mut Adapter, scroll_top: u64, now_ms: u64) {
    a.scroll_target_mut().state.scroll_top = scroll_top;
    a.on_scroll(now_ms);
}

fn element_ids(a: &Adapter) -> Vec<usize> {
    a.pool()
        .order()
        .iter()
        .map(|&id| a.pool().slot(id).expect("slot").target().id)
        .collect()
}

fn visible_indexes(a: &Adapter) -> Vec<usize> {
    a.pool()
        .visible_in_order()
        .into_iter()
        .filter_map(|id| a.pool().slot(id).and_then(|s| s.assigned_index()))
        .collect()
}

fn hidden_count(a: &Adapter) -> usize {
    a.pool()
        .order()
        .iter()
        .filter(|&&id| a.pool().slot(id).expect("slot").target().hidden)
        .count()
}

/// Checks what must hold after every public call.
fn assert_consistent(a: &Adapter) {
    let pool = a.pool();
    assert_eq!(a.container().children, element_ids(a), "container order");
    assert_eq!(a.container().observed.len(), pool.len());

    let mut seen = Vec::new();
    for id in pool.visible_in_order() {
        let slot = pool.slot(id).expect("slot");
        let index = slot.assigned_index().expect("visible slots are assigned");
        assert!(index < a.size());
        assert!(!seen.contains(&index), "index {index} shown twice");
        seen.push(index);
        let el = slot.target();
        assert!(!el.hidden);
        assert!(el.absolute);
        assert_eq!(el.content, Some(index), "content of slot {id:?}");
        assert_eq!(el.y, Some(a.sizes().start_of(index)), "position of {index}");
    }
    for index in a.window().start_index..a.window().end_index {
        assert!(seen.contains(&index), "window index {index} not shown");
    }
}

#[test]
fn missing_callbacks_are_rejected() {
    let err = ListAdapter::new(
        AdapterOptions::<FakeElement>::default(),
        FakeScroller::new(400),
        FakeDom::default(),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::MissingCreateElements);

    let err = ListAdapter::new(
        AdapterOptions::default().with_create_elements(create_elements()),
        FakeScroller::new(400),
        FakeDom::default(),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::MissingUpdateElement);
}

#[test]
fn debug_output_summarizes_the_adapter() {
    let mut a = adapter(400, options(40));
    a.set_size(100);
    let out = std::format!("{a:?}");
    assert!(out.starts_with("ListAdapter {"), "{out}");
    assert!(out.contains("pool_len: 15"), "{out}");
    assert!(out.contains("size: 100"), "{out}");
}

#[test]
fn pool_size_does_not_depend_on_list_size() {
    let mut small = adapter(400, options(40));
    small.set_size(10);
    let mut huge = adapter(400, options(40));
    huge.set_size(1_000_000);

    // ceil(400 / 40) + 1 + 2 * overscan
    assert_eq!(small.pool().len(), 15);
    assert_eq!(huge.pool().len(), 15);
    assert_eq!(small.container().children.len(), 15);

    scroll(&mut huge, 40 * 500_000, 0);
    assert_eq!(huge.pool().len(), 15);
    assert_eq!(huge.first_visible_index(), Some(500_000));
    assert_eq!(huge.last_visible_index(), Some(500_009));
    assert_consistent(&huge);
    assert_consistent(&small);
}

#[test]
fn first_visible_index_is_scroll_top_over_row_height() {
    let mut a = adapter(400, options(40));
    a.set_size(1000);
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let top = rng.gen_range(0, 1000 * 40 - 400);
        scroll(&mut a, top, 0);
        assert_eq!(a.first_visible_index(), Some((top / 40) as usize), "top={top}");
        assert_consistent(&a);
    }
}

#[test]
fn surplus_slots_are_hidden_for_short_lists() {
    let mut a = adapter(150, options(10));
    a.set_size(5);
    assert_eq!(a.pool().len(), 20);
    assert_eq!(hidden_count(&a), 15);
    assert_eq!(visible_indexes(&a), [0, 1, 2, 3, 4]);
    assert_consistent(&a);

    a.set_size(0);
    assert_eq!(hidden_count(&a), 20);
    assert_eq!(a.first_visible_index(), None);
    assert_consistent(&a);
}

#[test]
fn scrolling_recycles_and_reorder_restores_order() {
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(1000);
    let before = element_ids(&a);

    scroll(&mut a, 280, 0);
    assert_consistent(&a);
    // The five slots scrolled off the top now show 15..20 from the front of the container.
    assert_eq!(
        visible_indexes(&a),
        [15, 16, 17, 18, 19, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]
    );
    assert_eq!(element_ids(&a), before, "recycling alone moves no children");

    a.flush();
    assert_eq!(a.reorder_runs(), 1);
    assert_eq!(visible_indexes(&a), (5..20).collect::<Vec<_>>());
    assert_consistent(&a);

    assert_eq!(a.reorder_elements(), Reorder::Unchanged);
    assert_eq!(visible_indexes(&a), (5..20).collect::<Vec<_>>());
}

#[test]
fn reorder_never_moves_the_focused_child() {
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(1000);
    let focused = a.pool().slot_for_index(5).expect("index 5 is materialized");
    a.element_mut(focused).expect("slot").focused = true;
    let focused_id = a.pool().slot(focused).expect("slot").target().id;

    scroll(&mut a, 120, 0);
    assert_eq!(visible_indexes(&a)[0], 15);
    a.flush();

    assert_eq!(visible_indexes(&a), (1..16).collect::<Vec<_>>());
    assert!(!a.container().moved.contains(&focused_id));
    let el = a.pool().slot(focused).expect("slot").target();
    assert_eq!(el.content, Some(5));
    assert_eq!(el.y, Some(200));
    assert!(el.focused);
    assert_consistent(&a);
}

#[test]
fn reorder_is_debounced_until_scrolling_goes_idle() {
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(1000);
    for step in 0..10u64 {
        let now = step * 40;
        scroll(&mut a, 100 + step * 37, now);
        a.tick(now);
    }
    assert!(a.is_reorder_pending());
    assert_eq!(a.reorder_runs(), 0);

    // Last scroll at 360ms: fires at 860ms, once.
    a.tick(859);
    assert_eq!(a.reorder_runs(), 0);
    a.tick(860);
    assert_eq!(a.reorder_runs(), 1);
    assert!(!a.is_reorder_pending());
    a.tick(5000);
    assert_eq!(a.reorder_runs(), 1);
    assert_consistent(&a);
}

#[test]
fn reorder_disabled_never_schedules() {
    let mut a = adapter(400, options(40));
    a.set_size(1000);
    scroll(&mut a, 4000, 0);
    a.tick(10_000);
    a.flush();
    assert!(!a.is_reorder_pending());
    assert_eq!(a.reorder_runs(), 0);
    assert_consistent(&a);

    a.set_reorder_elements(true);
    scroll(&mut a, 4040, 10_000);
    assert!(a.is_reorder_pending());
    a.set_reorder_elements(false);
    assert!(!a.is_reorder_pending());
}

#[test]
fn scroll_to_index_moves_the_scroll_target() {
    let mut a = adapter(400, options(40));
    a.scroll_to_index(3);
    assert_eq!(a.scroll_target().state.scroll_top, 0, "empty list is a no-op");

    a.set_size(1000);
    a.scroll_to_index(100);
    assert_eq!(a.scroll_target().state.scroll_top, 4000);
    assert_eq!(a.first_visible_index(), Some(100));
    assert_consistent(&a);

    a.scroll_to_index_aligned(100, Align::End);
    assert_eq!(a.scroll_target().state.scroll_top, 4040 - 400);
    assert_eq!(a.last_visible_index(), Some(100));

    // Out of range clamps to the last item, and the last item cannot scroll past the end.
    a.scroll_to_index(5000);
    assert_eq!(a.scroll_target().state.scroll_top, 40_000 - 400);
    assert_eq!(a.first_visible_index(), Some(990));
    assert_eq!(a.last_visible_index(), Some(999));
    assert_consistent(&a);
}

#[test]
fn scroll_to_index_accounts_for_scroller_padding() {
    let mut scroller = FakeScroller::new(400);
    scroller.state.scroller_padding_top = 16;
    let mut a = ListAdapter::new(options(40), scroller, FakeDom::default()).expect("valid");
    a.set_size(100);
    a.scroll_to_index(10);
    assert_eq!(a.scroll_target().state.scroll_top, 416);
    assert_eq!(a.first_visible_index(), Some(10));
    assert_eq!(a.window().offset_of(10), Some(400));
    assert_consistent(&a);
}

#[test]
fn detached_scroll_target_uses_last_known_geometry() {
    let mut a = adapter(400, options(40));
    a.set_size(100);
    scroll(&mut a, 400, 0);
    assert_eq!(a.first_visible_index(), Some(10));

    a.scroll_target_mut().attached = false;
    a.on_scroll(10);
    assert_eq!(a.first_visible_index(), Some(10));
    assert_eq!(a.viewport().viewport_height, 400);

    a.scroll_to_index(50);
    assert_eq!(a.first_visible_index(), Some(50));
    assert_consistent(&a);
}

#[test]
fn measuring_rows_above_the_viewport_keeps_content_still() {
    let mut a = adapter(100, options(10));
    a.set_size(1000);
    scroll(&mut a, 200, 0);
    assert_eq!(a.first_visible_index(), Some(20));
    assert_eq!(a.window().start_index, 18);

    let slot = a.pool().slot_for_index(18).expect("overscan row is materialized");
    a.on_element_resized(slot, 30);
    assert!(a.has_deferred_work());
    assert_eq!(a.scroll_target().state.scroll_top, 200);

    a.tick(0);
    assert_eq!(a.scroll_target().state.scroll_top, 220);
    assert_eq!(a.first_visible_index(), Some(20));
    assert_eq!(a.sizes().start_of(20), 220);
    let y19 = a.pool().slot_for_index(19).and_then(|id| a.pool().slot(id)?.target().y);
    assert_eq!(y19, Some(210));
    assert_consistent(&a);
}

#[test]
fn viewport_resize_grows_the_pool_and_trim_shrinks_it() {
    let mut a = adapter(400, options(40));
    a.set_size(1000);
    assert_eq!(a.pool().len(), 15);

    a.scroll_target_mut().state.viewport_height = 800;
    a.on_resize();
    a.tick(0);
    assert_eq!(a.pool().len(), 25);
    assert_eq!(a.last_visible_index(), Some(19));
    assert_consistent(&a);

    a.scroll_target_mut().state.viewport_height = 400;
    a.on_resize();
    a.tick(0);
    assert_eq!(a.pool().len(), 25, "the pool never shrinks on its own");
    assert_consistent(&a);

    assert_eq!(a.trim(), 10);
    assert_eq!(a.pool().len(), 15);
    assert_eq!(a.container().children.len(), 15);
    assert_consistent(&a);
    assert_eq!(a.trim(), 0);
}

#[test]
fn update_callback_requests_run_on_the_next_turn() {
    let requested = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&requested);
    let opts = AdapterOptions::new(
        create_elements(),
        move |el: &mut FakeElement, index, ctx: &mut UpdateContext| {
            el.content = Some(index);
            if index == 0 && !flag.swap(true, Ordering::Relaxed) {
                ctx.request_size(50);
            }
        },
    )
    .with_estimated_item_height(40);
    let mut a = adapter(400, opts);

    a.set_size(10);
    assert!(requested.load(Ordering::Relaxed));
    assert_eq!(a.size(), 10);
    assert!(a.has_deferred_work());

    a.tick(0);
    assert_eq!(a.size(), 50);
    assert!(!a.has_deferred_work());
    assert_consistent(&a);
}

#[test]
fn set_size_rerenders_every_visible_slot() {
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);
    let opts = AdapterOptions::new(create_elements(), move |el: &mut FakeElement, index, _| {
        counter.fetch_add(1, Ordering::Relaxed);
        el.content = Some(index);
    })
    .with_estimated_item_height(40);
    let mut a = adapter(400, opts);
    assert_eq!(updates.load(Ordering::Relaxed), 0, "nothing to show yet");

    a.set_size(100);
    assert_eq!(updates.load(Ordering::Relaxed), 15);

    a.set_size(100);
    assert_eq!(updates.load(Ordering::Relaxed), 30);

    a.on_scroll(0);
    assert_eq!(updates.load(Ordering::Relaxed), 30, "unchanged slots are not re-rendered");

    a.invalidate(3);
    assert_eq!(updates.load(Ordering::Relaxed), 31);
}

#[test]
fn teardown_detaches_every_slot() {
    let mut a = adapter(400, options(40));
    a.set_size(100);
    let (scroller, dom) = a.teardown();
    assert!(scroller.attached);
    assert!(dom.children.is_empty());
    assert!(dom.observed.is_empty());
}

fn assert_ascending(a: &Adapter, context: &str) {
    let indexes = visible_indexes(a);
    assert!(
        indexes.windows(2).all(|w| w[0] < w[1]),
        "{context}: {indexes:?}"
    );
}

#[test]
fn reorder_restores_order_after_the_pool_grows_mid_scroll() {
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(1000);
    scroll(&mut a, 2010, 0);
    a.flush();
    assert_eq!(visible_indexes(&a), (48..63).collect::<Vec<_>>());

    a.scroll_target_mut().state.viewport_height = 480;
    a.on_resize();
    scroll(&mut a, 1990, 10);
    a.flush();
    assert_eq!(a.pool().len(), 17);
    assert_ascending(&a, "after growing");
    assert!(a.pool().is_ring_ordered());
    assert_consistent(&a);

    assert!(a.reorder_elements().is_unchanged());
    assert!(a.reorder_elements().is_unchanged());
}

#[test]
fn reorder_restores_order_after_trim() {
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(1000);
    a.scroll_target_mut().state.viewport_height = 800;
    a.on_resize();
    a.tick(0);
    scroll(&mut a, 3010, 0);
    a.flush();

    a.scroll_target_mut().state.viewport_height = 400;
    a.on_resize();
    a.tick(10);
    scroll(&mut a, 2990, 20);
    assert_eq!(a.trim(), 10);
    assert!(a.is_reorder_pending());
    a.flush();
    assert_ascending(&a, "after trim");
    assert_consistent(&a);
    assert!(a.reorder_elements().is_unchanged());
}

#[test]
fn random_operations_keep_slots_consistent_and_converge() {
    const HEIGHTS: [u32; 5] = [120, 200, 400, 640, 800];
    let mut a = adapter(400, options(40).with_reorder_elements(true));
    a.set_size(10_000);
    for seed in 0..20 {
        let mut rng = Lcg::new(seed);
        let mut now = 0u64;
        for step in 0..200 {
            now += rng.gen_range(1, 200);
            match rng.gen_range(0, 12) {
                0 => a.scroll_to_index(rng.gen_range(0, a.size().max(1) as u64) as usize),
                1 | 2 => {
                    a.flush();
                    assert_ascending(&a, &std::format!("seed {seed} step {step}"));
                }
                3 => a.tick(now),
                4 => {
                    let height = HEIGHTS[rng.gen_range(0, HEIGHTS.len() as u64) as usize];
                    a.scroll_target_mut().state.viewport_height = height;
                    a.on_resize();
                }
                5 => {
                    let visible = a.pool().visible_in_order();
                    if !visible.is_empty() {
                        let slot = visible[rng.gen_range(0, visible.len() as u64) as usize];
                        a.on_element_resized(slot, rng.gen_range(10, 80) as u32);
                    }
                }
                6 => {
                    let size = if rng.gen_range(0, 4) == 0 {
                        rng.gen_range(0, 50)
                    } else {
                        rng.gen_range(0, 20_000)
                    };
                    a.set_size(size as usize);
                }
                7 => {
                    a.trim();
                }
                _ => {
                    let top = a.viewport().scroll_top;
                    let delta = rng.gen_range(0, 2000);
                    let top = if rng.gen_range(0, 2) == 0 {
                        top.saturating_sub(delta)
                    } else {
                        top + delta
                    };
                    scroll(&mut a, top, now);
                }
            }
            assert!(a.pool().len() <= a.options().window.max_physical_count);
            assert_consistent(&a);
        }
        a.flush();
        assert_ascending(&a, &std::format!("seed {seed} end"));
    }
}
