//! Box-model style for a single element.
//!
//! Only two style sources exist: the user agent defaults below and the
//! element's inline `style` attribute. Declarations are applied in source
//! order, so a longhand written after its shorthand overrides it.

use serde::Serialize;

use reflow_common::warning::warn_once;
use reflow_dom::ElementData;

use crate::style_attr::StyleDeclarations;
use crate::values::{AutoLength, LengthValue};

/// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Display {
    /// "The element generates a block-level box."
    Block,
    /// "The element generates an inline-level box."
    ///
    /// NOTE: laid out exactly like `Block`; there are no inline formatting contexts.
    Inline,
    /// "The element and its descendants generate no boxes."
    None,
}

/// [§ 3 box-sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum BoxSizing {
    /// "width and height ... are applied to the content box"
    #[default]
    ContentBox,
    /// "width and height ... are applied to the border box"
    BorderBox,
}

/// [§ 9.3.1 Choosing a positioning scheme](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow. Then the
    /// box is offset relative to its normal position."
    Relative,
}

/// Four edge values in top, right, bottom, left order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Edges<T> {
    /// Top edge.
    pub top: T,
    /// Right edge.
    pub right: T,
    /// Bottom edge.
    pub bottom: T,
    /// Left edge.
    pub left: T,
}

impl<T: Copy> Edges<T> {
    /// All four edges set to the same value.
    pub const fn uniform(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides. If there
    /// are two values, the top and bottom margins are set to the first value and
    /// the right and left margins are set to the second. If there are three
    /// values, the top is set to the first value, the left and right are set to
    /// the second, and the bottom is set to the third. If there are four values,
    /// they apply to the top, right, bottom, and left, respectively."
    fn from_shorthand(values: &[T]) -> Option<Self> {
        match *values {
            [all] => Some(Self::uniform(all)),
            [vertical, horizontal] => Some(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Some(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Some(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => None,
        }
    }

    fn set(&mut self, side: &str, value: T) {
        match side {
            "top" => self.top = value,
            "right" => self.right = value,
            "bottom" => self.bottom = value,
            _ => self.left = value,
        }
    }
}

const ZERO: LengthValue = LengthValue::Px(0.0);

/// The used-value inputs of block layout for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStyle {
    /// Outer display type.
    pub display: Display,
    /// Positioning scheme.
    pub position: Position,
    /// Which box `width` and `height` size.
    pub box_sizing: BoxSizing,
    /// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,
    /// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: LengthValue,
    /// `None` is "none".
    pub max_width: Option<LengthValue>,
    /// [§ 10.7 Minimum and maximum heights](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: LengthValue,
    /// `None` is "none".
    pub max_height: Option<LengthValue>,
    /// Margins; `auto` is only meaningful horizontally.
    pub margin: Edges<AutoLength>,
    /// Padding widths.
    pub padding: Edges<LengthValue>,
    /// Border widths.
    pub border: Edges<LengthValue>,
    /// `top`/`right`/`bottom`/`left`, used when `position: relative`.
    pub offsets: Edges<AutoLength>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            position: Position::Static,
            box_sizing: BoxSizing::ContentBox,
            width: AutoLength::Auto,
            height: AutoLength::Auto,
            min_width: ZERO,
            max_width: None,
            min_height: ZERO,
            max_height: None,
            margin: Edges::uniform(AutoLength::Length(ZERO)),
            padding: Edges::uniform(ZERO),
            border: Edges::uniform(ZERO),
            offsets: Edges::uniform(AutoLength::Auto),
        }
    }
}

/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
///
/// "`[hidden], area, base, basefont, datalist, head, link, meta, noembed,
/// noframes, param, rp, script, style, template, title { display: none; }`"
const HIDDEN_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
    "param", "rp", "script", "style", "template", "title",
];

/// [§ 15.3.3 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "img",
    "input", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup",
    "time", "u", "var",
];

impl BoxStyle {
    /// Resolve the box style of `element`: user agent defaults, then the
    /// declarations of its inline `style` attribute in source order.
    #[must_use]
    pub fn for_element(element: &ElementData) -> Self {
        let mut style = Self::user_agent_default(element);
        if let Some(inline) = element.style() {
            for declaration in StyleDeclarations::parse(inline).iter() {
                style.apply(&declaration.name, &declaration.value);
            }
        }
        style
    }

    /// [§ 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
    ///
    /// The subset of the suggested default rendering that affects block geometry.
    fn user_agent_default(element: &ElementData) -> Self {
        let tag = element.tag_name.to_ascii_lowercase();
        let mut style = Self::default();
        if HIDDEN_ELEMENTS.contains(&tag.as_str()) || element.attrs.contains("hidden") {
            style.display = Display::None;
        } else if INLINE_ELEMENTS.contains(&tag.as_str()) {
            style.display = Display::Inline;
        }
        // [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
        // "body { margin: 8px; }"
        if tag == "body" {
            style.margin = Edges::uniform(AutoLength::Length(LengthValue::Px(8.0)));
        }
        style
    }

    /// Apply one declaration. Unsupported properties are ignored; invalid
    /// values for supported properties are reported once and dropped.
    pub fn apply(&mut self, name: &str, value: &str) {
        let applied = match name {
            "display" => self.apply_display(value),
            "position" => match value.trim().to_ascii_lowercase().as_str() {
                "static" => {
                    self.position = Position::Static;
                    true
                }
                "relative" => {
                    self.position = Position::Relative;
                    true
                }
                other => {
                    warn_once("CSS", &format!("position '{other}' laid out as static"));
                    self.position = Position::Static;
                    true
                }
            },
            "box-sizing" => match value.trim().to_ascii_lowercase().as_str() {
                "content-box" => {
                    self.box_sizing = BoxSizing::ContentBox;
                    true
                }
                "border-box" => {
                    self.box_sizing = BoxSizing::BorderBox;
                    true
                }
                _ => false,
            },
            "width" => set_from(&mut self.width, AutoLength::parse(value)),
            "height" => set_from(&mut self.height, AutoLength::parse(value)),
            "min-width" => set_from(&mut self.min_width, parse_min(value)),
            "min-height" => set_from(&mut self.min_height, parse_min(value)),
            "max-width" => set_from(&mut self.max_width, parse_max(value)),
            "max-height" => set_from(&mut self.max_height, parse_max(value)),
            "margin" => set_from(
                &mut self.margin,
                parse_shorthand(value, AutoLength::parse),
            ),
            "padding" => set_from(
                &mut self.padding,
                parse_shorthand(value, non_negative_length),
            ),
            "border-width" => set_from(
                &mut self.border,
                parse_shorthand(value, border_width),
            ),
            "border" => set_from(&mut self.border, parse_border(value).map(Edges::uniform)),
            "top" | "right" | "bottom" | "left" => match AutoLength::parse(value) {
                Some(offset) => {
                    self.offsets.set(name, offset);
                    true
                }
                None => false,
            },
            _ => return self.apply_side_longhand(name, value),
        };
        if !applied {
            warn_once("CSS", &format!("invalid value '{value}' for '{name}'"));
        }
    }

    /// `margin-top`, `padding-left`, `border-right-width`, `border-bottom` and friends.
    fn apply_side_longhand(&mut self, name: &str, value: &str) {
        let (prefix, rest) = name.split_once('-').unwrap_or((name, ""));
        let (side, suffix) = rest.split_once('-').unwrap_or((rest, ""));
        if !matches!(side, "top" | "right" | "bottom" | "left") {
            log::trace!("ignoring unsupported property '{name}'");
            return;
        }
        let applied = match (prefix, suffix) {
            ("margin", "") => AutoLength::parse(value)
                .map(|v| self.margin.set(side, v))
                .is_some(),
            ("padding", "") => non_negative_length(value)
                .map(|v| self.padding.set(side, v))
                .is_some(),
            ("border", "width") => border_width(value)
                .map(|v| self.border.set(side, v))
                .is_some(),
            ("border", "") => parse_border(value)
                .map(|v| self.border.set(side, v))
                .is_some(),
            _ => {
                log::trace!("ignoring unsupported property '{name}'");
                return;
            }
        };
        if !applied {
            warn_once("CSS", &format!("invalid value '{value}' for '{name}'"));
        }
    }

    fn apply_display(&mut self, value: &str) -> bool {
        self.display = match value.trim().to_ascii_lowercase().as_str() {
            "none" => Display::None,
            "block" | "list-item" | "flow-root" => Display::Block,
            "inline" => Display::Inline,
            other => {
                warn_once("CSS", &format!("display '{other}' laid out as block"));
                Display::Block
            }
        };
        true
    }

    /// Whether this element generates a box at all.
    #[must_use]
    pub fn generates_box(&self) -> bool {
        self.display != Display::None
    }
}

fn set_from<T>(slot: &mut T, parsed: Option<T>) -> bool {
    parsed.map(|value| *slot = value).is_some()
}

fn non_negative_length(value: &str) -> Option<LengthValue> {
    LengthValue::parse(value).filter(|l| match l {
        LengthValue::Px(v) | LengthValue::Em(v) | LengthValue::Rem(v) | LengthValue::Percent(v) => {
            *v >= 0.0
        }
    })
}

fn parse_min(value: &str) -> Option<LengthValue> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return Some(ZERO);
    }
    non_negative_length(value)
}

fn parse_max(value: &str) -> Option<Option<LengthValue>> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Some(None);
    }
    non_negative_length(value).map(Some)
}

/// [§ 4.3 Line Thickness](https://www.w3.org/TR/css-backgrounds-3/#border-width)
///
/// "thin, medium and thick ... The thin, medium, and thick keywords are
/// equivalent to 1px, 3px, and 5px, respectively."
fn border_width(value: &str) -> Option<LengthValue> {
    match value.trim().to_ascii_lowercase().as_str() {
        "thin" => Some(LengthValue::Px(1.0)),
        "medium" => Some(LengthValue::Px(3.0)),
        "thick" => Some(LengthValue::Px(5.0)),
        _ => non_negative_length(value).filter(|l| !l.is_percentage()),
    }
}

/// [§ 4.4 Border Shorthands](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
///
/// Only the width component matters for geometry. A border whose style is
/// `none` or `hidden` has zero width; an omitted width is `medium`, but an
/// omitted style is `none`, so a bare `border: 2px` draws nothing.
fn parse_border(value: &str) -> Option<LengthValue> {
    let mut width = None;
    let mut has_style = false;
    for part in value.split_whitespace() {
        let lower = part.to_ascii_lowercase();
        if matches!(lower.as_str(), "none" | "hidden") {
            return Some(ZERO);
        }
        if matches!(
            lower.as_str(),
            "dotted" | "dashed" | "solid" | "double" | "groove" | "ridge" | "inset" | "outset"
        ) {
            has_style = true;
        } else if width.is_none() {
            width = border_width(part);
        }
    }
    if !has_style {
        return Some(ZERO);
    }
    Some(width.unwrap_or(LengthValue::Px(3.0)))
}

fn parse_shorthand<T: Copy>(value: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Edges<T>> {
    let values: Option<Vec<T>> = value.split_whitespace().map(parse).collect();
    Edges::from_shorthand(&values?)
}
