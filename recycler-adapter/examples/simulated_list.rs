// Example: drive a `ListAdapter` with a simulated DOM.
//
// The host forwards scroll/resize events and ticks the adapter once per event-loop turn. Here
// the "DOM" is a plain child list so the effect of recycling and reordering is printable.
use recycler::{RenderTarget, ScrollTarget, ViewportState};
use recycler_adapter::{AdapterOptions, ElementsContainer, ListAdapter};

#[derive(Debug, Default)]
struct Element {
    id: usize,
    y: u64,
    hidden: bool,
    text: String,
}

impl RenderTarget for Element {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn set_translate_y(&mut self, y: u64) {
        self.y = y;
    }
}

#[derive(Debug, Default)]
struct Container {
    children: Vec<usize>,
}

impl ElementsContainer<Element> for Container {
    fn append_child(&mut self, element: &Element) {
        self.children.retain(|&c| c != element.id);
        self.children.push(element.id);
    }

    fn insert_before(&mut self, element: &Element, reference: &Element) {
        self.children.retain(|&c| c != element.id);
        let at = self
            .children
            .iter()
            .position(|&c| c == reference.id)
            .unwrap_or(0);
        self.children.insert(at, element.id);
    }

    fn remove_child(&mut self, element: &Element) {
        self.children.retain(|&c| c != element.id);
    }
}

struct Scroller(ViewportState);

impl ScrollTarget for Scroller {
    fn measure(&self) -> Option<ViewportState> {
        Some(self.0)
    }

    fn set_scroll_top(&mut self, scroll_top: u64) {
        self.0.scroll_top = scroll_top;
    }
}

fn print_rows(list: &ListAdapter<Element, Scroller, Container>) {
    let rows: Vec<&str> = list
        .pool()
        .order()
        .iter()
        .filter_map(|&id| list.pool().slot(id))
        .filter(|s| !s.is_hidden())
        .map(|s| s.target().text.as_str())
        .collect();
    println!("  children: {rows:?}");
}

fn main() {
    let next_id = std::sync::atomic::AtomicUsize::new(0);
    let options = AdapterOptions::new(
        move |n| {
            (0..n)
                .map(|_| Element {
                    id: next_id.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
                    ..Element::default()
                })
                .collect()
        },
        |el: &mut Element, index, _| el.text = format!("item {index}"),
    )
    .with_estimated_item_height(30)
    .with_overscan(1)
    .with_reorder_elements(true);

    let scroller = Scroller(ViewportState {
        scroll_top: 0,
        viewport_height: 120,
        scroller_padding_top: 0,
    });
    let mut list = match ListAdapter::new(options, scroller, Container::default()) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    list.set_size(10_000);
    println!("pool of {} slots for 10000 items", list.pool().len());
    print_rows(&list);

    list.scroll_target_mut().0.scroll_top = 95;
    list.on_scroll(0);
    println!("scrolled to 95, before reorder:");
    print_rows(&list);

    list.tick(500);
    println!("after idle reorder ({} run):", list.reorder_runs());
    print_rows(&list);

    list.scroll_to_index(9_999);
    list.flush();
    println!("scroll_to_index(9999): visible={:?}", list.visible_range());
    print_rows(&list);

    let (_, container) = list.teardown();
    println!("children after teardown: {}", container.children.len());
}
