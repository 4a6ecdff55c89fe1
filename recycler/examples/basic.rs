// Example: window math and a bounded pool over a million rows.
use recycler::{
    Align, ItemSizes, Pool, RenderTarget, ViewportState, WindowOptions, compute_window,
    scroll_offset_for_index,
};

#[derive(Debug, Default)]
struct Row {
    y: u64,
    hidden: bool,
    text: String,
}

impl RenderTarget for Row {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn set_translate_y(&mut self, y: u64) {
        self.y = y;
    }
}

fn main() {
    let options = WindowOptions::default().with_estimated_item_height(20);
    let mut sizes = ItemSizes::new(options.estimated_item_height);
    sizes.set_count(1_000_000);

    let mut viewport = ViewportState {
        scroll_top: 123_456,
        viewport_height: 300,
        scroller_padding_top: 0,
    };

    let mut pool = Pool::new();
    pool.set_size(sizes.count());
    let capacity = options.capacity_for(viewport.viewport_height, sizes.typical_size());
    pool.ensure_capacity(capacity, |n| (0..n).map(|_| Row::default()).collect());

    let window = compute_window(&viewport, &sizes, options.overscan);
    pool.recycle(window.start_index);
    let stats = pool.render(&sizes, |_, row, index| row.text = format!("row {index}"));
    println!("pool={} window={:?} {stats:?}", pool.len(), window.range());

    viewport.scroll_top = scroll_offset_for_index(&sizes, &viewport, 999_999, Align::End);
    let window = compute_window(&viewport, &sizes, options.overscan);
    pool.recycle(window.start_index);
    pool.render(&sizes, |_, row, index| row.text = format!("row {index}"));
    println!(
        "after scroll_to_index: scroll_top={} visible={:?}",
        viewport.scroll_top, window.visible
    );

    let plan = pool.plan_reorder();
    pool.apply_reorder(&plan);
    println!("reorder moved {} children", plan.moves());
}
