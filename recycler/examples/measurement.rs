// Example: measured rows shift the offsets of everything below them.
use recycler::{ItemSizes, ViewportState, visible_range};

fn main() {
    let mut sizes = ItemSizes::new(40);
    sizes.set_count(100);

    let viewport = ViewportState {
        scroll_top: 400,
        viewport_height: 200,
        scroller_padding_top: 0,
    };
    println!("before: visible={:?}", visible_range(&viewport, &sizes));

    // Rows 0..5 turn out to be twice as tall as estimated.
    for i in 0..5 {
        sizes.measure(i, 80);
    }
    println!(
        "after: visible={:?} start_of(10)={} typical={}",
        visible_range(&viewport, &sizes),
        sizes.start_of(10),
        sizes.typical_size()
    );
}
