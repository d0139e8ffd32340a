//! The probe sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::geometry::GeometryField;
use crate::hooks::ProbeHooks;
use crate::host::LayoutHost;
use crate::rebuild::rebuild_from_scratch;
use crate::sink::{Phase, ProbeEvent, ProbeLog};

/// Logged before the mutation.
pub const INCREMENTAL_INTENT: &str = "Make changes and perform incremental layout";

/// Logged before the rebuild.
pub const FROM_SCRATCH_INTENT: &str =
    "Perform from scratch layout, below values should differ from above";

/// An element to report on, by id, and the fields to report.
///
/// The same field list is used for both reports of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedElement {
    /// Element id, looked up again for every report.
    pub id: String,
    /// Fields to report, in order.
    #[serde(default = "GeometryField::all")]
    pub fields: Vec<GeometryField>,
}

impl TrackedElement {
    /// Track `id` with the given fields.
    pub fn new(id: impl Into<String>, fields: Vec<GeometryField>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Parses `id` (all fields) or `id:field,field` (possibly no fields: `id:`).
impl FromStr for TrackedElement {
    type Err = ProbeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (id, fields) = match input.split_once(':') {
            Some((id, fields)) => (id, GeometryField::parse_list(fields)?),
            None => (input, GeometryField::all()),
        };
        let id = id.trim().trim_start_matches('#');
        if id.is_empty() {
            return Err(ProbeError::InvalidTrackedElement(input.to_string()));
        }
        Ok(Self::new(id, fields))
    }
}

impl fmt::Display for TrackedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.iter().map(AsRef::as_ref).collect();
        write!(f, "#{}:{}", self.id, fields.join(","))
    }
}

/// Runs the mutate, report, rebuild, report sequence.
#[derive(Debug)]
pub struct ProbeSequencer<K> {
    hooks: K,
    tracked: Vec<TrackedElement>,
}

impl<K> ProbeSequencer<K> {
    /// A sequencer that applies `hooks` and reports on `tracked`.
    pub const fn new(hooks: K, tracked: Vec<TrackedElement>) -> Self {
        Self { hooks, tracked }
    }

    /// The tracked elements, in report order.
    #[must_use]
    pub fn tracked(&self) -> &[TrackedElement] {
        &self.tracked
    }

    /// The hooks.
    pub const fn hooks(&self) -> &K {
        &self.hooks
    }

    /// Run the sequence once:
    ///
    /// 1. intent "Make changes and perform incremental layout"
    /// 2. [`ProbeHooks::apply_mutation`]
    /// 3. a geometry report per tracked element
    /// 4. intent "Perform from scratch layout, below values should differ from above"
    /// 5. [`rebuild_from_scratch`]
    /// 6. a geometry report per tracked element
    ///
    /// Steps run strictly in order and nothing is retried.
    ///
    /// # Errors
    ///
    /// The first failure of any step ends the run. Events recorded before
    /// the failure stay in `log`.
    pub fn run<H, L>(&mut self, host: &mut H, log: &mut L) -> Result<(), ProbeError>
    where
        H: LayoutHost + ?Sized,
        L: ProbeLog + ?Sized,
        K: ProbeHooks<H>,
    {
        log.record(ProbeEvent::Intent {
            phase: Phase::Incremental,
            message: INCREMENTAL_INTENT.to_string(),
        })?;
        self.hooks.apply_mutation(host)?;
        self.report_all(host, log, Phase::Incremental)?;

        log.record(ProbeEvent::Intent {
            phase: Phase::FromScratch,
            message: FROM_SCRATCH_INTENT.to_string(),
        })?;
        rebuild_from_scratch(host)?;
        self.report_all(host, log, Phase::FromScratch)
    }

    fn report_all<H, L>(&mut self, host: &mut H, log: &mut L, phase: Phase) -> Result<(), ProbeError>
    where
        H: LayoutHost + ?Sized,
        L: ProbeLog + ?Sized,
        K: ProbeHooks<H>,
    {
        for tracked in &self.tracked {
            // Handles do not survive a rebuild; resolve by id every time.
            let element = host
                .get_element_by_id(&tracked.id)
                .ok_or_else(|| ProbeError::ElementNotFound(tracked.id.clone()))?;
            let snapshot = self.hooks.report_geometry(host, element, &tracked.fields)?;
            log.record(ProbeEvent::Geometry { phase, snapshot })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TrackedElement;
    use crate::error::ProbeError;
    use crate::geometry::GeometryField;

    #[test]
    fn tracked_element_syntax() {
        let all: TrackedElement = "box".parse().expect("tracked");
        assert_eq!(all.fields, GeometryField::all());

        let some: TrackedElement = "#box:width,height".parse().expect("tracked");
        assert_eq!(
            some,
            TrackedElement::new("box", vec![GeometryField::Width, GeometryField::Height])
        );
        assert_eq!(some.to_string(), "#box:width,height");

        let none: TrackedElement = "box:".parse().expect("tracked");
        assert!(none.fields.is_empty());
    }

    #[test]
    fn tracked_element_errors() {
        assert!(matches!(
            ":width".parse::<TrackedElement>(),
            Err(ProbeError::InvalidTrackedElement(_))
        ));
        assert!(matches!(
            "box:depth".parse::<TrackedElement>(),
            Err(ProbeError::UnknownField(_))
        ));
    }
}
