//! Inline style and block layout for the reflow headless page.
//!
//! # Scope
//!
//! - **Style attribute** ([CSS Style Attributes](https://www.w3.org/TR/css-style-attr/)):
//!   ordered declaration blocks that can be edited and serialized back.
//! - **Values** ([CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)):
//!   `px`, `em`, `rem`, percentages and `auto`.
//! - **Box style**: the handful of box-model properties that decide where a
//!   block box lands.
//! - **Layout** ([CSS 2.1 § 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)):
//!   block formatting contexts in normal flow, with a layout cache that is
//!   updated incrementally after style changes.
//!
//! # Not Yet Implemented
//!
//! - Stylesheets, selectors and the cascade (only inline styles and UA defaults apply)
//! - Inline formatting contexts (inline boxes are laid out as blocks)
//! - Margin collapsing, floats, absolute positioning

/// Box-model style resolved from an element.
pub mod style;
/// Parsing and serialization of the `style` attribute.
pub mod style_attr;
/// CSS length values.
pub mod values;

/// Block layout and the incremental layout cache.
pub mod layout;

pub use layout::{BoxDimensions, DomRect, EdgeSizes, LayoutEngine, LayoutStats, Rect};
pub use style::{BoxSizing, BoxStyle, Display, Position};
pub use style_attr::{Declaration, StyleDeclarations};
pub use values::{AutoLength, DEFAULT_FONT_SIZE_PX, LengthValue};
