//! A headless windowed-recycling engine for virtual lists.
//!
//! For the host-facing adapter (element factory, update callback, container wiring), see the
//! `recycler-adapter` crate.
//!
//! Rendering a list of a million rows should cost as much as rendering one screenful. This
//! crate provides the pieces that make that true:
//!
//! - [`ItemSizes`]: per-item sizes, estimated until measured, with `O(log n)` offset queries
//! - [`compute_window`]: which indexes to materialize for a viewport (plus overscan)
//! - [`Pool`]: a bounded set of recycled render targets mapped onto virtual indexes
//! - [`Pool::plan_reorder`]: repairs child order after recycling, anchored on focus
//! - [`Debouncer`]: last-call-wins scheduling for idle-time work
//!
//! It is UI-agnostic. A host is expected to provide:
//! - a [`ScrollTarget`] to read viewport geometry from
//! - [`RenderTarget`]s (e.g. DOM elements) for the pool to recycle
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod debounce;
mod key;
mod pool;
mod prefix;
mod render;
mod reorder;
mod sizes;
mod types;
mod viewport;
mod window;
mod windowed;


pub use debounce::Debouncer;
pub use pool::{PhysicalSlot, Pool, RenderTarget};
pub use render::RenderStats;
pub use reorder::Reorder;
pub use sizes::{DEFAULT_ITEM_HEIGHT, ItemSizes};
pub use types::{Align, SlotId, VirtualRange};
pub use viewport::{ScrollTarget, ViewportState, ViewportTracker};
pub use window::{
    Window, WindowOptions, compute_window, max_scroll_offset, scroll_offset_for_index,
    visible_range,
};
pub use windowed::WindowedList;
