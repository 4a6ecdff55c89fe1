/// Measured geometry of the scroll target.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Scroll offset of the scroll target, padding included.
    pub scroll_top: u64,
    /// Visible height of the scroll target.
    pub viewport_height: u32,
    /// Top padding of the scroll target; the list starts after it.
    pub scroller_padding_top: u32,
}

impl ViewportState {
    /// Scroll offset relative to the start of the list.
    pub fn list_offset(&self) -> u64 {
        self.scroll_top
            .saturating_sub(u64::from(self.scroller_padding_top))
    }
}

/// The scrollable container a list is virtualized inside.
pub trait ScrollTarget {
    /// Reads the current geometry, or `None` when the target is detached.
    fn measure(&self) -> Option<ViewportState>;

    /// Writes the scroll offset (padding included).
    fn set_scroll_top(&mut self, scroll_top: u64);
}

/// Remembers the last geometry read from a [`ScrollTarget`].
///
/// Measuring never fails: a detached target yields the last known state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportTracker {
    last: ViewportState,
    measured: bool,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measure(&mut self, target: &impl ScrollTarget) -> ViewportState {
        match target.measure() {
            Some(state) => {
                if state != self.last {
                    vtrace!(
                        scroll_top = state.scroll_top,
                        viewport_height = state.viewport_height,
                        padding_top = state.scroller_padding_top,
                        "ViewportTracker::measure"
                    );
                }
                self.last = state;
                self.measured = true;
            }
            None => {
                vtrace!("ViewportTracker::measure: detached, using last known state");
            }
        }
        self.last
    }

    /// Records a scroll offset written by the owner, so a detached target still reflects it.
    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        self.last.scroll_top = scroll_top;
    }

    pub fn last(&self) -> ViewportState {
        self.last
    }

    /// Whether a measurement ever succeeded.
    pub fn has_measured(&self) -> bool {
        self.measured
    }
}
