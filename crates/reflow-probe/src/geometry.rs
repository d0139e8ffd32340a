//! Geometry fields and the geometry reporter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use reflow_css::DomRect;

use crate::error::ProbeError;
use crate::host::LayoutHost;

/// [CSSOM View § DOMRectReadOnly](https://drafts.fxtf.org/geometry/#domrectreadonly)
///
/// The attributes of a bounding client rect a probe can report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GeometryField {
    /// Horizontal origin.
    X,
    /// Vertical origin.
    Y,
    /// Width of the border box.
    Width,
    /// Height of the border box.
    Height,
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl GeometryField {
    /// Read this field out of `rect`.
    #[must_use]
    pub const fn read(self, rect: &DomRect) -> f64 {
        match self {
            Self::X => rect.x,
            Self::Y => rect.y,
            Self::Width => rect.width,
            Self::Height => rect.height,
            Self::Top => rect.top,
            Self::Right => rect.right,
            Self::Bottom => rect.bottom,
            Self::Left => rect.left,
        }
    }

    /// Every field, in `x y width height top right bottom left` order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Parse a comma separated list such as `width,height`. An empty string
    /// is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::UnknownField`] for the first name that is not a
    /// geometry field.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ProbeError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Self::from_str(name).map_err(|_| ProbeError::UnknownField(name.to_string()))
            })
            .collect()
    }
}

/// One `(field, value)` pair of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Which field was read.
    pub field: GeometryField,
    /// Its value at the time of the read.
    pub value: f64,
}

/// The requested fields of one element's bounding client rect, in the order
/// they were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    /// The element's `id` attribute (without `#`).
    pub element: String,
    /// Field values in request order.
    pub values: Vec<FieldValue>,
}

impl GeometrySnapshot {
    /// Value of `field`, if it was requested.
    #[must_use]
    pub fn get(&self, field: GeometryField) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.value)
    }

    /// Requested fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = GeometryField> + '_ {
        self.values.iter().map(|v| v.field)
    }
}

/// A number the way the browser console prints it: shortest round-trip
/// digits, exponent notation below `1e-6` and from `1e21` on, `Infinity`,
/// `-Infinity` and `NaN` spelled out, and `-0` as `0`.
#[must_use]
pub fn console_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let value = value + 0.0;
    let magnitude = value.abs();
    if magnitude > 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    value.to_string()
}

/// `#box { width: 200, height: 50 }`, or `#box {}` when no field was requested.
impl fmt::Display for GeometrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {{", self.element)?;
        for (i, FieldValue { field, value }) in self.values.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{field}: {}", console_number(*value))?;
        }
        if self.values.is_empty() {
            f.write_str("}")
        } else {
            f.write_str(" }")
        }
    }
}

/// Geometry reporter: read the bounding client rect of `element` and keep
/// the requested `fields`, in order.
///
/// Reading geometry may make the host lay out pending changes, but never
/// changes the document.
///
/// # Errors
///
/// Whatever the host reports for a detached or unknown element.
pub fn report_geometry<H: LayoutHost + ?Sized>(
    host: &mut H,
    element: H::Element,
    fields: &[GeometryField],
) -> Result<GeometrySnapshot, ProbeError> {
    let rect = host.bounding_client_rect(element)?;
    let id = host.element_id(element)?.unwrap_or_default();
    Ok(GeometrySnapshot {
        element: id,
        values: fields
            .iter()
            .map(|&field| FieldValue {
                field,
                value: field.read(&rect),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, GeometryField, GeometrySnapshot, console_number};
    use crate::error::ProbeError;

    #[test]
    fn display_matches_console_format() {
        let snapshot = GeometrySnapshot {
            element: "box".to_string(),
            values: vec![
                FieldValue {
                    field: GeometryField::Width,
                    value: 200.0,
                },
                FieldValue {
                    field: GeometryField::Height,
                    value: 19.2,
                },
            ],
        };
        assert_eq!(snapshot.to_string(), "#box { width: 200, height: 19.2 }");
    }

    #[test]
    fn empty_snapshot_display() {
        let snapshot = GeometrySnapshot {
            element: "box".to_string(),
            values: Vec::new(),
        };
        assert_eq!(snapshot.to_string(), "#box {}");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        let snapshot = GeometrySnapshot {
            element: "a".to_string(),
            values: vec![FieldValue {
                field: GeometryField::X,
                value: -0.0,
            }],
        };
        assert_eq!(snapshot.to_string(), "#a { x: 0 }");
    }

    #[test]
    fn numbers_print_like_the_console() {
        assert_eq!(console_number(200.0), "200");
        assert_eq!(console_number(19.2), "19.2");
        assert_eq!(console_number(-0.0), "0");
        assert_eq!(console_number(0.000_001), "0.000001");
        assert_eq!(console_number(1e20), "100000000000000000000");
        assert_eq!(console_number(1e21), "1e+21");
        assert_eq!(console_number(-2.5e22), "-2.5e+22");
        assert_eq!(console_number(1.5e-7), "1.5e-7");
        assert_eq!(console_number(f64::INFINITY), "Infinity");
        assert_eq!(console_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(console_number(f64::NAN), "NaN");
    }

    #[test]
    fn parse_list_keeps_order_and_rejects_unknown() {
        assert_eq!(
            GeometryField::parse_list("height, width,x").expect("fields"),
            vec![GeometryField::Height, GeometryField::Width, GeometryField::X]
        );
        assert!(GeometryField::parse_list("").expect("empty").is_empty());
        assert!(matches!(
            GeometryField::parse_list("width,depth"),
            Err(ProbeError::UnknownField(name)) if name == "depth"
        ));
    }

    #[test]
    fn all_fields_in_dom_rect_order() {
        let names: Vec<String> = GeometryField::all().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["x", "y", "width", "height", "top", "right", "bottom", "left"]
        );
    }
}
