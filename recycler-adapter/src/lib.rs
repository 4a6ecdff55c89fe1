//! Host adapter for the `recycler` crate.
//!
//! `recycler` is UI-agnostic and only does the window math and slot bookkeeping. This crate
//! wires it to a host:
//!
//! - [`ListAdapter`]: the virtual list itself. It creates slots through a factory, fills them
//!   through an update callback, and mirrors recycling into an [`ElementsContainer`]
//! - debounced child reordering, so focus and tab order follow virtual order once scrolling
//!   goes idle
//! - scroll anchoring ([`ScrollAnchor`]) so measuring rows does not make content jump
//!
//! Time is passed in by the host (`on_scroll(now_ms)`, `tick(now_ms)`), which keeps the adapter
//! deterministic and usable without a runtime.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod adapter;
mod anchor;
mod error;
mod host;
mod options;

#[cfg(test)]
mod tests;

pub use adapter::ListAdapter;
pub use anchor::{ScrollAnchor, anchored_offset, capture_first_visible_anchor};
pub use error::ConfigError;
pub use host::{ElementsContainer, Request, UpdateContext};
pub use options::{AdapterOptions, CreateElements, DEFAULT_REORDER_DELAY_MS, UpdateElement};
