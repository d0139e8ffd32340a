//! CSS Layout Engine
//!
//! [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Layout runs on the DOM directly: every element that generates a box maps
//! to exactly one block box, so no separate box tree is kept. Results live in
//! a per-node cache owned by [`LayoutEngine`].

/// CSS Box Model types.
pub mod box_model;
/// Block layout with an incremental cache.
pub mod engine;

pub use box_model::{BoxDimensions, DomRect, EdgeSizes, Rect};
pub use engine::{LayoutEngine, LayoutStats};
