//! CSS Length values and parsing
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use serde::Serialize;

use reflow_common::warning::warn_once;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// `font-size` is not modelled, so `em` and `rem` both resolve against this.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
/// "Lengths refer to distance measurements and are denoted by `<length>` in the
/// property definitions."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthValue {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1px = 1/96th of 1in"
    Px(f64),
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    /// "Equal to the computed value of the font-size property of the element"
    Em(f64),
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    /// "Equal to the computed value of the font-size property of the root element."
    Rem(f64),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    /// "A <percentage> value is denoted by <percentage>, and consists of a
    /// <number> immediately followed by a percent sign '%'."
    Percent(f64),
}

impl LengthValue {
    /// Resolve to pixels. Percentages resolve against `basis`; callers pass
    /// the containing block dimension the property refers to.
    ///
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    /// NOTE: Margin AND padding percentages both resolve against the containing
    /// block's **width**, even for top/bottom.
    #[must_use]
    pub fn to_px(&self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => *px,
            Self::Em(em) | Self::Rem(em) => *em * DEFAULT_FONT_SIZE_PX,
            Self::Percent(pct) => *pct * basis / 100.0,
        }
    }

    /// Whether resolving this value needs a containing block dimension.
    #[must_use]
    pub const fn is_percentage(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Parse a single `<length-percentage>` such as `12px`, `1.5em` or `50%`.
    ///
    /// "For zero lengths the unit identifier is optional (i.e. can be
    /// syntactically represented as the `<number>` 0)."
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(number) = input.strip_suffix('%') {
            return parse_number(number).map(Self::Percent);
        }
        let split = input
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(input.len());
        let (number, unit) = input.split_at(split);
        let value = parse_number(number)?;
        if unit.is_empty() {
            return (value == 0.0).then_some(Self::Px(0.0));
        }
        if unit.eq_ignore_ascii_case("px") {
            Some(Self::Px(value))
        } else if unit.eq_ignore_ascii_case("em") {
            Some(Self::Em(value))
        } else if unit.eq_ignore_ascii_case("rem") {
            Some(Self::Rem(value))
        } else {
            warn_once("CSS", &format!("unsupported unit '{unit}'"));
            None
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "If both 'margin-left' and 'margin-right' are 'auto', their used values
/// are equal. This horizontally centers the element with respect to the
/// edges of the containing block."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum AutoLength {
    /// The value is 'auto' and will be resolved during layout.
    #[default]
    Auto,
    /// A specific length value (px, em, etc.).
    Length(LengthValue),
}

impl AutoLength {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve to pixels, or `None` if 'auto'.
    #[must_use]
    pub fn resolve(&self, basis: f64) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Length(len) => Some(len.to_px(basis)),
        }
    }

    /// Parse `auto` or a `<length-percentage>`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case("auto") {
            return Some(Self::Auto);
        }
        LengthValue::parse(input).map(Self::Length)
    }
}

fn parse_number(input: &str) -> Option<f64> {
    // Rust accepts "inf", "NaN" and exponents that CSS numbers do not.
    if input.is_empty()
        || !input
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }
    input.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{AutoLength, LengthValue};

    #[test]
    fn parses_units() {
        assert_eq!(LengthValue::parse("12px"), Some(LengthValue::Px(12.0)));
        assert_eq!(LengthValue::parse(" 1.5em "), Some(LengthValue::Em(1.5)));
        assert_eq!(LengthValue::parse("2REM"), Some(LengthValue::Rem(2.0)));
        assert_eq!(LengthValue::parse("50%"), Some(LengthValue::Percent(50.0)));
        assert_eq!(LengthValue::parse("-4px"), Some(LengthValue::Px(-4.0)));
        assert_eq!(LengthValue::parse("0"), Some(LengthValue::Px(0.0)));
    }

    #[test]
    fn rejects_unitless_non_zero_and_junk() {
        assert_eq!(LengthValue::parse("10"), None);
        assert_eq!(LengthValue::parse("px"), None);
        assert_eq!(LengthValue::parse("inf"), None);
        assert_eq!(LengthValue::parse("3vmax"), None);
    }

    #[test]
    fn resolves_against_basis() {
        assert!((LengthValue::Percent(25.0).to_px(200.0) - 50.0).abs() < f64::EPSILON);
        assert!((LengthValue::Em(2.0).to_px(0.0) - 32.0).abs() < f64::EPSILON);
        assert_eq!(AutoLength::parse("AUTO"), Some(AutoLength::Auto));
        assert_eq!(AutoLength::Auto.resolve(100.0), None);
    }
}
