//! Incremental versus from-scratch comparison.
//!
//! A correct engine lays a document out the same way whether it updates
//! its layout incrementally or starts over, so every value reported in the
//! incremental phase must match the one reported after the rebuild. A value
//! reported in one phase but not the other counts as a difference too.

use std::fmt;

use serde::Serialize;

use crate::error::ProbeError;
use crate::geometry::{GeometryField, GeometrySnapshot, console_number};
use crate::sink::{Phase, ProbeEvent};

/// One field that came out differently in the two phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryDifference {
    /// Element id.
    pub element: String,
    /// Field that differs.
    pub field: GeometryField,
    /// Value after incremental layout, `None` if it was not reported.
    pub incremental: Option<f64>,
    /// Value after the from-scratch rebuild, `None` if it was not reported.
    pub from_scratch: Option<f64>,
}

impl fmt::Display for GeometryDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value =
            |v: Option<f64>| v.map_or_else(|| "missing".to_string(), console_number);
        write!(
            f,
            "#{} {}: {} incremental, {} from scratch",
            self.element,
            self.field,
            value(self.incremental),
            value(self.from_scratch)
        )
    }
}

/// Outcome of comparing the two phases of a probe run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", content = "differences", rename_all = "snake_case")]
pub enum LayoutVerdict {
    /// Both phases agree.
    Pass,
    /// Incremental layout disagrees with from-scratch layout.
    LayoutBug(Vec<GeometryDifference>),
}

impl LayoutVerdict {
    /// Compare the geometry events of a run.
    ///
    /// Snapshots are paired in report order. Values further apart than
    /// `tolerance` are differences, as is any snapshot or field present in
    /// only one phase, and any NaN.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidTolerance`] unless `tolerance` is finite
    /// and not negative.
    pub fn from_events(events: &[ProbeEvent], tolerance: f64) -> Result<Self, ProbeError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ProbeError::InvalidTolerance(tolerance));
        }
        let snapshots = |wanted: Phase| -> Vec<&GeometrySnapshot> {
            events
                .iter()
                .filter(|event| event.phase() == wanted)
                .filter_map(ProbeEvent::snapshot)
                .collect()
        };
        let incremental = snapshots(Phase::Incremental);
        let from_scratch = snapshots(Phase::FromScratch);

        let mut differences = Vec::new();
        for i in 0..incremental.len().max(from_scratch.len()) {
            match (incremental.get(i), from_scratch.get(i)) {
                (Some(before), Some(after)) if before.element == after.element => {
                    compare(before, after, tolerance, &mut differences);
                }
                (before, after) => {
                    // Unpaired or paired with a different element.
                    if let Some(before) = before {
                        unmatched(before, Phase::Incremental, &mut differences);
                    }
                    if let Some(after) = after {
                        unmatched(after, Phase::FromScratch, &mut differences);
                    }
                }
            }
        }

        if differences.is_empty() {
            Ok(Self::Pass)
        } else {
            Ok(Self::LayoutBug(differences))
        }
    }

    /// Whether the run exposed a layout bug.
    #[must_use]
    pub const fn is_bug(&self) -> bool {
        matches!(self, Self::LayoutBug(_))
    }
}

fn same_value(a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    // Bit equality covers matching infinities, whose difference is NaN.
    a.to_bits() == b.to_bits() || (a - b).abs() <= tolerance
}

fn compare(
    before: &GeometrySnapshot,
    after: &GeometrySnapshot,
    tolerance: f64,
    differences: &mut Vec<GeometryDifference>,
) {
    for value in &before.values {
        let other = after.get(value.field);
        if other.is_some_and(|other| same_value(value.value, other, tolerance)) {
            continue;
        }
        differences.push(GeometryDifference {
            element: before.element.clone(),
            field: value.field,
            incremental: Some(value.value),
            from_scratch: other,
        });
    }
    for value in &after.values {
        if before.get(value.field).is_none() {
            differences.push(GeometryDifference {
                element: after.element.clone(),
                field: value.field,
                incremental: None,
                from_scratch: Some(value.value),
            });
        }
    }
}

fn unmatched(snapshot: &GeometrySnapshot, phase: Phase, differences: &mut Vec<GeometryDifference>) {
    for value in &snapshot.values {
        let (incremental, from_scratch) = match phase {
            Phase::Incremental => (Some(value.value), None),
            Phase::FromScratch => (None, Some(value.value)),
        };
        differences.push(GeometryDifference {
            element: snapshot.element.clone(),
            field: value.field,
            incremental,
            from_scratch,
        });
    }
}

impl fmt::Display for LayoutVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::LayoutBug(differences) => {
                write!(f, "LAYOUT BUG ({} differences)", differences.len())?;
                for difference in differences {
                    write!(f, "\n  {difference}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GeometryDifference, LayoutVerdict};
    use crate::error::ProbeError;
    use crate::geometry::{FieldValue, GeometryField, GeometrySnapshot};
    use crate::sink::{Phase, ProbeEvent};

    fn report(phase: Phase, element: &str, values: &[(GeometryField, f64)]) -> ProbeEvent {
        ProbeEvent::Geometry {
            phase,
            snapshot: GeometrySnapshot {
                element: element.to_string(),
                values: values
                    .iter()
                    .map(|&(field, value)| FieldValue { field, value })
                    .collect(),
            },
        }
    }

    fn differences(verdict: LayoutVerdict) -> Vec<GeometryDifference> {
        match verdict {
            LayoutVerdict::Pass => Vec::new(),
            LayoutVerdict::LayoutBug(differences) => differences,
        }
    }

    #[test]
    fn matching_phases_pass() {
        let events = [
            report(Phase::Incremental, "a", &[(GeometryField::Width, 10.0)]),
            report(Phase::FromScratch, "a", &[(GeometryField::Width, 10.0)]),
        ];
        assert_eq!(LayoutVerdict::from_events(&events, 0.0).expect("verdict"), LayoutVerdict::Pass);
    }

    #[test]
    fn missing_from_scratch_report_is_a_bug() {
        let events = [
            report(Phase::Incremental, "a", &[(GeometryField::Width, 10.0)]),
            report(Phase::Incremental, "b", &[(GeometryField::Height, 5.0)]),
            report(Phase::FromScratch, "a", &[(GeometryField::Width, 10.0)]),
        ];
        let found = differences(LayoutVerdict::from_events(&events, 0.0).expect("verdict"));
        assert_eq!(
            found,
            [GeometryDifference {
                element: "b".to_string(),
                field: GeometryField::Height,
                incremental: Some(5.0),
                from_scratch: None,
            }]
        );
    }

    #[test]
    fn extra_from_scratch_report_is_a_bug() {
        let events = [report(Phase::FromScratch, "a", &[(GeometryField::X, 1.0)])];
        let found = differences(LayoutVerdict::from_events(&events, 0.0).expect("verdict"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].incremental, None);
    }

    #[test]
    fn missing_field_and_swapped_elements_are_bugs() {
        let events = [
            report(
                Phase::Incremental,
                "a",
                &[(GeometryField::Width, 10.0), (GeometryField::Height, 4.0)],
            ),
            report(Phase::FromScratch, "a", &[(GeometryField::Width, 10.0)]),
        ];
        let found = differences(LayoutVerdict::from_events(&events, 0.0).expect("verdict"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, GeometryField::Height);
        assert_eq!(found[0].from_scratch, None);
        assert_eq!(
            found[0].to_string(),
            "#a height: 4 incremental, missing from scratch"
        );

        let swapped = [
            report(Phase::Incremental, "a", &[(GeometryField::Y, 0.0)]),
            report(Phase::FromScratch, "b", &[(GeometryField::Y, 0.0)]),
        ];
        let found = differences(LayoutVerdict::from_events(&swapped, 0.0).expect("verdict"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn nan_is_never_equal() {
        let events = [
            report(Phase::Incremental, "a", &[(GeometryField::Top, f64::NAN)]),
            report(Phase::FromScratch, "a", &[(GeometryField::Top, f64::NAN)]),
        ];
        assert!(LayoutVerdict::from_events(&events, 1.0).expect("verdict").is_bug());
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tolerance in [f64::NAN, f64::INFINITY, -0.5] {
            assert!(matches!(
                LayoutVerdict::from_events(&[], tolerance),
                Err(ProbeError::InvalidTolerance(_))
            ));
        }
    }
}
