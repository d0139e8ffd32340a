//! Style mutation hooks.
//!
//! The probe does not know what a mutation does. It is handed a
//! [`ProbeHooks`] implementation and calls it at the right point of the
//! sequence; the hooks can also take over how geometry is reported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::geometry::{GeometryField, GeometrySnapshot, report_geometry};
use crate::host::LayoutHost;

/// The two capabilities the caller plugs into a probe run.
pub trait ProbeHooks<H: LayoutHost + ?Sized> {
    /// Change the page. Anything goes; the probe only brackets it with
    /// geometry reads.
    ///
    /// # Errors
    ///
    /// Any failure ends the probe run.
    fn apply_mutation(&mut self, host: &mut H) -> Result<(), ProbeError>;

    /// Report the geometry of one tracked element. Defaults to
    /// [`report_geometry`].
    ///
    /// # Errors
    ///
    /// Any failure ends the probe run.
    fn report_geometry(
        &mut self,
        host: &mut H,
        element: H::Element,
        fields: &[GeometryField],
    ) -> Result<GeometrySnapshot, ProbeError> {
        report_geometry(host, element, fields)
    }
}

/// `document.getElementById(element).style.setProperty(property, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleChange {
    /// Target element id.
    pub element: String,
    /// CSS property name.
    pub property: String,
    /// New value; empty removes the property.
    pub value: String,
}

impl StyleChange {
    /// A change of `property` on `#element` to `value`.
    pub fn new(
        element: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    fn apply<H: LayoutHost + ?Sized>(&self, host: &mut H) -> Result<(), ProbeError> {
        let element = host
            .get_element_by_id(&self.element)
            .ok_or_else(|| ProbeError::ElementNotFound(self.element.clone()))?;
        log::debug!("applying {self}");
        host.set_style_property(element, &self.property, &self.value)
    }
}

/// Parses `id:property=value`, e.g. `box:width=200px`.
impl FromStr for StyleChange {
    type Err = ProbeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ProbeError::InvalidStyleChange(input.to_string());
        let (element, assignment) = input.split_once(':').ok_or_else(invalid)?;
        let (property, value) = assignment.split_once('=').ok_or_else(invalid)?;
        let element = element.trim().trim_start_matches('#');
        let property = property.trim();
        if element.is_empty() || property.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(element, property, value.trim()))
    }
}

impl fmt::Display for StyleChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.element, self.property, self.value)
    }
}

/// A fixed list of style changes, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleChanges(pub Vec<StyleChange>);

impl<H: LayoutHost + ?Sized> ProbeHooks<H> for StyleChanges {
    fn apply_mutation(&mut self, host: &mut H) -> Result<(), ProbeError> {
        for change in &self.0 {
            change.apply(host)?;
        }
        Ok(())
    }
}

impl FromIterator<StyleChange> for StyleChanges {
    fn from_iter<I: IntoIterator<Item = StyleChange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Hooks around a closure, for mutations a list of style changes cannot
/// express.
pub struct FnHooks<F>(pub F);

impl<F> fmt::Debug for FnHooks<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHooks(..)")
    }
}

impl<H, F> ProbeHooks<H> for FnHooks<F>
where
    H: LayoutHost + ?Sized,
    F: FnMut(&mut H) -> Result<(), ProbeError>,
{
    fn apply_mutation(&mut self, host: &mut H) -> Result<(), ProbeError> {
        (self.0)(host)
    }
}

#[cfg(test)]
mod tests {
    use super::StyleChange;
    use crate::error::ProbeError;

    #[test]
    fn parses_cli_syntax() {
        let change: StyleChange = "#box:width = 200px".parse().expect("change");
        assert_eq!(change, StyleChange::new("box", "width", "200px"));
        assert_eq!(change.to_string(), "#box width: 200px");
    }

    #[test]
    fn value_may_contain_separators() {
        let change: StyleChange = "a:background=url(x:y=z)".parse().expect("change");
        assert_eq!(change.value, "url(x:y=z)");
    }

    #[test]
    fn rejects_missing_parts() {
        for bad in ["box", "box:width", ":width=1px", "box:=1px"] {
            assert!(
                matches!(bad.parse::<StyleChange>(), Err(ProbeError::InvalidStyleChange(_))),
                "{bad} should not parse"
            );
        }
    }
}
