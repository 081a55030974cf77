//! A headless staggered grid layout engine.
//!
//! Items of varying sizes are distributed over a fixed number of parallel spans (columns for a
//! vertical grid, rows for a horizontal one). Each new item goes to the span whose edge is the
//! least advanced, so spans fill unevenly and the content stays compact. Span assignments are
//! remembered per position, which keeps items in the same span while scrolling back and forth
//! and across saved/restored state.
//!
//! Full-span items cross every span. When they are laid out while the spans above them end at
//! different lines, the grid records the gap they leave and repairs it once scrolling settles.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - container geometry ([`Viewport`])
//! - items, their sizes and full-span flags ([`ItemProvider`])
//! - scroll deltas, data-change notifications and a clock for idle work
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod axis;
mod children;
mod cursor;
mod error;
mod fill;
mod focus;
mod gaps;
mod grid;
mod idle;
mod lookup;
mod options;
mod provider;
mod queries;
mod scroll;
mod scrollbar;
mod span;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use axis::{Axis, OrientationOracle, OrientedAxis, Viewport};
pub use error::GridError;
pub use grid::StaggeredGrid;
pub use idle::IdleTask;
pub use lookup::FullSpanItem;
pub use options::LayoutOptions;
pub use provider::ItemProvider;
pub use state::SavedState;
pub use types::{
    AttachPoint, Bounds, ChildRef, Constraint, FocusDirection, GapStrategy, ItemDirection,
    ItemSize, LayoutDirection, MeasureConstraints, MeasureMode, Orientation, ScrollVector,
};
