//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::Serialize;

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxDimensions {
    /// Content area, in viewport coordinates.
    pub content: Rect,
    /// Padding widths around the content.
    pub padding: EdgeSizes,
    /// Border widths around the padding.
    pub border: EdgeSizes,
    /// Margin widths around the border.
    pub margin: EdgeSizes,
}

/// A rectangle positioned in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f64,
    /// Vertical position of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

/// Edge sizes for padding, border, or margin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f64,
    /// Right edge size.
    pub right: f64,
    /// Bottom edge size.
    pub bottom: f64,
    /// Left edge size.
    pub left: f64,
}

impl EdgeSizes {
    /// `left + right`.
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl BoxDimensions {
    // ┌─────────────────────────────────────────┐
    // │              margin-top                 │
    // │   ┌─────────────────────────────────┐   │
    // │   │          border-top             │   │
    // │   │   ┌─────────────────────────┐   │   │
    // │   │   │      padding-top        │   │   │
    // │   │   │   ┌─────────────────┐   │   │   │
    // │ m │ b │ p │     CONTENT     │ p │ b │ m │
    // │   │   │   └─────────────────┘   │   │   │
    // │   │   │      padding-bottom     │   │   │
    // │   │   └─────────────────────────┘   │   │
    // │   │          border-bottom          │   │
    // │   └─────────────────────────────────┘   │
    // │              margin-bottom              │
    // └─────────────────────────────────────────┘

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        let border = self.border_box();
        Rect {
            x: border.x - self.margin.left,
            y: border.y - self.margin.top,
            width: border.width + self.margin.horizontal(),
            height: border.height + self.margin.vertical(),
        }
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.content.x - self.padding.left,
            y: self.content.y - self.padding.top,
            width: self.content.width + self.padding.horizontal(),
            height: self.content.height + self.padding.vertical(),
        }
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box(&self) -> Rect {
        let padding = self.padding_box();
        Rect {
            x: padding.x - self.border.left,
            y: padding.y - self.border.top,
            width: padding.width + self.border.horizontal(),
            height: padding.height + self.border.vertical(),
        }
    }

    /// Move the whole box by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.content.x += dx;
        self.content.y += dy;
    }
}

/// [CSSOM View § 6 DOMRect](https://drafts.fxtf.org/geometry/#domrect)
///
/// What `getBoundingClientRect()` hands back: the border box in viewport
/// coordinates, plus the derived edge accessors.
///
/// "The top attribute's getter must return min(y coordinate, y coordinate +
/// height dimension) of this DOMRectReadOnly."
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DomRect {
    /// "The x coordinate of the origin."
    pub x: f64,
    /// "The y coordinate of the origin."
    pub y: f64,
    /// "The width dimension."
    pub width: f64,
    /// "The height dimension."
    pub height: f64,
    /// `min(y, y + height)`.
    pub top: f64,
    /// `max(x, x + width)`.
    pub right: f64,
    /// `max(y, y + height)`.
    pub bottom: f64,
    /// `min(x, x + width)`.
    pub left: f64,
}

impl DomRect {
    /// Build a rect from its origin and size, deriving the four edges.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y.min(y + height),
            right: x.max(x + width),
            bottom: y.max(y + height),
            left: x.min(x + width),
        }
    }
}

impl From<Rect> for DomRect {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxDimensions, DomRect, EdgeSizes, Rect};

    #[test]
    fn border_box_wraps_padding_and_border() {
        let dims = BoxDimensions {
            content: Rect {
                x: 20.0,
                y: 30.0,
                width: 100.0,
                height: 50.0,
            },
            padding: EdgeSizes {
                top: 5.0,
                right: 5.0,
                bottom: 5.0,
                left: 5.0,
            },
            border: EdgeSizes {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            },
            margin: EdgeSizes::default(),
        };
        let border = dims.border_box();
        assert_eq!(
            border,
            Rect {
                x: 11.0,
                y: 24.0,
                width: 116.0,
                height: 64.0
            }
        );
    }

    #[test]
    fn dom_rect_edges_follow_negative_sizes() {
        let rect = DomRect::new(10.0, 10.0, -4.0, 6.0);
        assert_eq!(rect.left, 6.0);
        assert_eq!(rect.right, 10.0);
        assert_eq!(rect.bottom, 16.0);
    }
}
