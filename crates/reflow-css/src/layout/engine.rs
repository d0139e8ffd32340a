//! Block layout in normal flow, with a per-node layout cache.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block."
//!
//! # Incremental layout
//!
//! Every laid-out element keeps a [`CachedBox`] holding its geometry and the
//! inputs it was computed from: the containing block it was sized against
//! and the flow position it was placed at. Style changes mark the element
//! `STYLE` dirty and its ancestors `DESCENDANT` dirty. A flush then walks
//! down from the root and:
//!
//! - recomputes boxes that carry any dirty bit;
//! - reuses a clean box whose containing block has the same size,
//!   translating its whole subtree if its position moved;
//! - recomputes a clean box whose containing block was resized.
//!
//! [`LayoutEngine::invalidate_all`] drops the cache so the next flush lays out
//! every box from scratch.

use std::collections::HashMap;

use serde::Serialize;

use reflow_dom::{DomTree, NodeId, NodeType};

use super::box_model::{BoxDimensions, DomRect, EdgeSizes, Rect};
use crate::style::{BoxSizing, BoxStyle, Edges, Position};
use crate::values::{AutoLength, DEFAULT_FONT_SIZE_PX, LengthValue};

/// Height of the single line box a non-blank text node produces.
///
/// [§ 10.8.1 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
/// "normal: Tells user agents to set the used value to a 'reasonable' value
/// based on the font of the element. We recommend a used value for 'normal'
/// between 1.0 to 1.2."
pub const LINE_HEIGHT_PX: f64 = 1.2 * DEFAULT_FONT_SIZE_PX;

/// Default viewport size used when a page does not pick one.
pub const DEFAULT_VIEWPORT: (f64, f64) = (800.0, 600.0);

/// Per-node dirty flags used for incremental reflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DirtyKind(u8);

impl DirtyKind {
    /// The node's own style changed.
    const STYLE: Self = Self(1 << 0);
    /// Some descendant's style changed.
    const DESCENDANT: Self = Self(1 << 1);

    const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    const fn is_clean(self) -> bool {
        self.0 == 0
    }
}

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
#[derive(Debug, Clone, Copy, PartialEq)]
struct ContainingBlock {
    x: f64,
    width: f64,
    /// `None` when the height depends on content.
    height: Option<f64>,
}

impl ContainingBlock {
    /// Same size, position ignored. Bit equality: any change at all
    /// invalidates the cached box.
    fn same_size(&self, other: &Self) -> bool {
        self.width.to_bits() == other.width.to_bits()
            && self.height.map(f64::to_bits) == other.height.map(f64::to_bits)
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedBox {
    dims: BoxDimensions,
    containing_block: ContainingBlock,
    /// Top of the margin box in the parent's flow, before relative offsets.
    flow_y: f64,
    /// Vertical space the box takes up in the parent's flow.
    flow_height: f64,
}

/// Counters for the most recent flush that did any work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    /// Boxes whose geometry was computed.
    pub boxes_laid_out: usize,
    /// Boxes taken from the cache, possibly translated.
    pub boxes_reused: usize,
    /// Whether the flush discarded the cache first.
    pub full_layout: bool,
}

/// Lays out a [`DomTree`] and answers geometry queries about it.
#[derive(Debug)]
pub struct LayoutEngine {
    viewport_width: f64,
    viewport_height: f64,
    cache: HashMap<NodeId, CachedBox>,
    dirty_map: HashMap<NodeId, DirtyKind>,
    needs_full_layout: bool,
    stats: LayoutStats,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1)
    }
}

impl LayoutEngine {
    /// An engine with an empty cache for a viewport of the given size.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            cache: HashMap::new(),
            dirty_map: HashMap::new(),
            needs_full_layout: true,
            stats: LayoutStats::default(),
        }
    }

    /// `(width, height)` of the viewport.
    #[must_use]
    pub const fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Resize the viewport. Everything depends on it, so the cache goes too.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.invalidate_all();
    }

    /// Record that `node`'s style changed and flag the path to the root.
    pub fn mark_style_dirty(&mut self, tree: &DomTree, node: NodeId) {
        self.mark_dirty(node, DirtyKind::STYLE);
        for ancestor in tree.ancestors(node) {
            self.mark_dirty(ancestor, DirtyKind::DESCENDANT);
        }
    }

    fn mark_dirty(&mut self, node: NodeId, kind: DirtyKind) {
        let entry = self.dirty_map.entry(node).or_default();
        *entry = entry.or(kind);
    }

    /// Discard every cached box; the next flush lays out from scratch.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
        self.dirty_map.clear();
        self.needs_full_layout = true;
    }

    /// Whether a flush would do any work.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        self.needs_full_layout || !self.dirty_map.is_empty()
    }

    /// Counters from the last flush that did work.
    #[must_use]
    pub const fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Bring the cache up to date with `tree`. Returns `false` when nothing
    /// was pending.
    pub fn flush(&mut self, tree: &DomTree) -> bool {
        if !self.needs_layout() {
            return false;
        }
        let full_layout = self.needs_full_layout;
        if full_layout {
            self.cache.clear();
        }
        self.stats = LayoutStats {
            full_layout,
            ..LayoutStats::default()
        };

        if let Some(root) = tree.document_element() {
            // [§ 10.1](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
            // "The containing block in which the root element lives is a rectangle
            // called the initial containing block. For continuous media, it has the
            // dimensions of the viewport and is anchored at the canvas origin"
            let initial = ContainingBlock {
                x: 0.0,
                width: self.viewport_width,
                height: Some(self.viewport_height),
            };
            let _ = self.layout_box(tree, root, initial, 0.0);
        }

        self.dirty_map.clear();
        self.needs_full_layout = false;
        log::debug!(
            "layout flush: {} laid out, {} reused{}",
            self.stats.boxes_laid_out,
            self.stats.boxes_reused,
            if full_layout { " (full)" } else { "" }
        );
        true
    }

    /// Cached geometry of `node`, if it generated a box in the last flush.
    #[must_use]
    pub fn box_dimensions(&self, node: NodeId) -> Option<BoxDimensions> {
        self.cache.get(&node).map(|cached| cached.dims)
    }

    /// [CSSOM View § 6.1 getBoundingClientRect()](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    ///
    /// "If the list of boxes is empty, return a DOMRect object whose x, y, width
    /// and height members are zero."
    ///
    /// Reads the cache only; call [`flush`](Self::flush) first.
    #[must_use]
    pub fn client_rect(&self, node: NodeId) -> DomRect {
        self.cache
            .get(&node)
            .map_or_else(DomRect::default, |cached| cached.dims.border_box().into())
    }

    /// Lay out `id` with its margin box starting at `flow_y`, returning the
    /// vertical space it occupies in its parent's flow.
    fn layout_box(&mut self, tree: &DomTree, id: NodeId, cb: ContainingBlock, flow_y: f64) -> f64 {
        let Some(element) = tree.as_element(id) else {
            return 0.0;
        };

        let dirty = self.dirty_map.get(&id).copied().unwrap_or_default();
        if dirty.is_clean() {
            if let Some(cached) = self.cache.get(&id).copied() {
                if cached.containing_block.same_size(&cb) {
                    let dx = cb.x - cached.containing_block.x;
                    let dy = flow_y - cached.flow_y;
                    self.reuse_subtree(tree, id, dx, dy);
                    return cached.flow_height;
                }
            }
        }

        let style = BoxStyle::for_element(element);
        if !style.generates_box() {
            self.forget_subtree(tree, id);
            return 0.0;
        }

        let cbw = cb.width;
        let padding = resolve_edges(&style.padding, cbw);
        let border = resolve_edges(&style.border, cbw);
        let extra_width = padding.horizontal() + border.horizontal();
        let extra_height = padding.vertical() + border.vertical();

        // [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
        //
        // 'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
        // 'padding-right' + 'border-right-width' + 'margin-right' = width of
        // containing block
        let margin_left = style.margin.left.resolve(cbw);
        let margin_right = style.margin.right.resolve(cbw);
        let specified_width = style
            .width
            .resolve(cbw)
            .map(|w| content_size(w, style.box_sizing, extra_width));
        let tentative_width = specified_width.unwrap_or_else(|| {
            (cbw - margin_left.unwrap_or(0.0) - margin_right.unwrap_or(0.0) - extra_width).max(0.0)
        });
        // [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
        let width = clamp_size(
            tentative_width,
            content_size(style.min_width.to_px(cbw), style.box_sizing, extra_width),
            style
                .max_width
                .map(|max| content_size(max.to_px(cbw), style.box_sizing, extra_width)),
        );
        let width_is_fixed =
            specified_width.is_some() || width.to_bits() != tentative_width.to_bits();

        let (used_margin_left, used_margin_right) = if width_is_fixed {
            let free = cbw - width - extra_width;
            match (margin_left, margin_right) {
                // "If both 'margin-left' and 'margin-right' are 'auto', their used
                // values are equal."
                (None, None) => {
                    let half = (free / 2.0).max(0.0);
                    (half, half)
                }
                // "If there is exactly one value specified as 'auto', its used value
                // follows from the equality."
                (None, Some(right)) => (free - right, right),
                (Some(left), None) => (left, free - left),
                // Over-constrained: "the specified value for 'margin-right' is ignored"
                (Some(left), Some(_)) => (left, free - left),
            }
        } else {
            // "If 'width' is set to 'auto', any other 'auto' values become '0'"
            (margin_left.unwrap_or(0.0), margin_right.unwrap_or(0.0))
        };

        // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        // Vertical 'auto' margins are zero in normal flow.
        let margin_top = style.margin.top.resolve(cbw).unwrap_or(0.0);
        let margin_bottom = style.margin.bottom.resolve(cbw).unwrap_or(0.0);

        // [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
        // "If the height of the containing block is not specified explicitly ...
        // the value computes to 'auto'."
        let specified_height = resolve_height(style.height, cb.height)
            .map(|h| content_size(h, style.box_sizing, extra_height));
        let min_height = resolve_height(AutoLength::Length(style.min_height), cb.height)
            .map_or(0.0, |h| content_size(h, style.box_sizing, extra_height));
        let max_height = style
            .max_height
            .and_then(|max| resolve_height(AutoLength::Length(max), cb.height))
            .map(|h| content_size(h, style.box_sizing, extra_height));
        let definite_height = specified_height.map(|h| clamp_size(h, min_height, max_height));

        // [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
        let (offset_x, offset_y) = if style.position == Position::Relative {
            relative_offsets(&style, cb)
        } else {
            (0.0, 0.0)
        };

        let content_x = cb.x + used_margin_left + border.left + padding.left + offset_x;
        let content_y = flow_y + margin_top + border.top + padding.top + offset_y;

        let child_cb = ContainingBlock {
            x: content_x,
            width,
            height: definite_height,
        };
        let mut cursor = content_y;
        for &child in tree.children(id) {
            let Some(node) = tree.get(child) else {
                continue;
            };
            match &node.node_type {
                NodeType::Element(_) => cursor += self.layout_box(tree, child, child_cb, cursor),
                // One line box per run of text; no line breaking.
                NodeType::Text(text) if !text.trim().is_empty() => cursor += LINE_HEIGHT_PX,
                _ => {}
            }
        }

        let height = definite_height
            .unwrap_or_else(|| clamp_size(cursor - content_y, min_height, max_height));

        let dims = BoxDimensions {
            content: Rect {
                x: content_x,
                y: content_y,
                width,
                height,
            },
            padding,
            border,
            margin: EdgeSizes {
                top: margin_top,
                right: used_margin_right,
                bottom: margin_bottom,
                left: used_margin_left,
            },
        };
        let flow_height = margin_top + extra_height + height + margin_bottom;
        let _ = self.cache.insert(
            id,
            CachedBox {
                dims,
                containing_block: cb,
                flow_y,
                flow_height,
            },
        );
        self.stats.boxes_laid_out += 1;
        flow_height
    }

    fn reuse_subtree(&mut self, tree: &DomTree, id: NodeId, dx: f64, dy: f64) {
        for node in tree.descendants(id) {
            if let Some(cached) = self.cache.get_mut(&node) {
                cached.dims.translate(dx, dy);
                cached.containing_block.x += dx;
                cached.flow_y += dy;
                self.stats.boxes_reused += 1;
            }
        }
    }

    fn forget_subtree(&mut self, tree: &DomTree, id: NodeId) {
        for node in tree.descendants(id) {
            let _ = self.cache.remove(&node);
        }
    }
}

fn resolve_edges(edges: &Edges<LengthValue>, basis: f64) -> EdgeSizes {
    EdgeSizes {
        top: edges.top.to_px(basis),
        right: edges.right.to_px(basis),
        bottom: edges.bottom.to_px(basis),
        left: edges.left.to_px(basis),
    }
}

/// [§ 3 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
///
/// "border-box: ... The content width and height are calculated by
/// subtracting the border and padding widths of the respective sides from the
/// specified width and height properties. As the content width and height
/// cannot be negative, this computation is floored at 0."
fn content_size(specified: f64, sizing: BoxSizing, extra: f64) -> f64 {
    match sizing {
        BoxSizing::ContentBox => specified,
        BoxSizing::BorderBox => (specified - extra).max(0.0),
    }
}

/// "If the tentative used width is greater than 'max-width' ... If the
/// resulting width is smaller than 'min-width' ..." - min wins over max.
fn clamp_size(value: f64, min: f64, max: Option<f64>) -> f64 {
    let capped = max.map_or(value, |max| value.min(max));
    capped.max(min).max(0.0)
}

fn resolve_height(height: AutoLength, containing_height: Option<f64>) -> Option<f64> {
    match height {
        AutoLength::Auto => None,
        AutoLength::Length(length) if length.is_percentage() => {
            containing_height.map(|basis| length.to_px(basis))
        }
        AutoLength::Length(length) => Some(length.to_px(0.0)),
    }
}

/// "If both 'left' and 'right' are 'auto', their used values are 0 ... If
/// neither is 'auto', ... 'right' is ignored" (likewise `top` over `bottom`).
fn relative_offsets(style: &BoxStyle, cb: ContainingBlock) -> (f64, f64) {
    let horizontal = style
        .offsets
        .left
        .resolve(cb.width)
        .or_else(|| style.offsets.right.resolve(cb.width).map(|right| -right))
        .unwrap_or(0.0);
    let vertical = resolve_height(style.offsets.top, cb.height)
        .or_else(|| resolve_height(style.offsets.bottom, cb.height).map(|bottom| -bottom))
        .unwrap_or(0.0);
    (horizontal, vertical)
}
