//! Where probe output goes.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::ProbeError;
use crate::geometry::GeometrySnapshot;

/// Which half of a probe run an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// After the style mutation, before the rebuild.
    Incremental,
    /// After the document was rebuilt from its markup.
    FromScratch,
}

/// One line of probe output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProbeEvent {
    /// A message announcing what happens next.
    Intent {
        /// Phase the message introduces.
        phase: Phase,
        /// The message text.
        message: String,
    },
    /// A geometry report.
    Geometry {
        /// Phase the report was taken in.
        phase: Phase,
        /// The reported values.
        snapshot: GeometrySnapshot,
    },
}

impl ProbeEvent {
    /// The phase this event belongs to.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Intent { phase, .. } | Self::Geometry { phase, .. } => *phase,
        }
    }

    /// The snapshot, for geometry events.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&GeometrySnapshot> {
        match self {
            Self::Geometry { snapshot, .. } => Some(snapshot),
            Self::Intent { .. } => None,
        }
    }
}

impl fmt::Display for ProbeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intent { message, .. } => f.write_str(message),
            Self::Geometry { snapshot, .. } => write!(f, "{snapshot}"),
        }
    }
}

/// A sink for probe events, the probe's only output channel.
pub trait ProbeLog {
    /// Record one event.
    ///
    /// # Errors
    ///
    /// Sinks backed by I/O fail when writing fails.
    fn record(&mut self, event: ProbeEvent) -> Result<(), ProbeError>;
}

/// Keeps every event in memory.
impl ProbeLog for Vec<ProbeEvent> {
    fn record(&mut self, event: ProbeEvent) -> Result<(), ProbeError> {
        self.push(event);
        Ok(())
    }
}

/// Writes one line per event, the way a browser console would show them.
#[derive(Debug)]
pub struct ConsoleLog<W: Write> {
    out: W,
}

impl<W: Write> ConsoleLog<W> {
    /// Write events to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProbeLog for ConsoleLog<W> {
    fn record(&mut self, event: ProbeEvent) -> Result<(), ProbeError> {
        log::debug!(target: "reflow::probe", "[{}] {event}", event.phase());
        writeln!(self.out, "{event}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleLog, Phase, ProbeEvent, ProbeLog};
    use crate::geometry::{FieldValue, GeometryField, GeometrySnapshot};

    fn geometry_event() -> ProbeEvent {
        ProbeEvent::Geometry {
            phase: Phase::FromScratch,
            snapshot: GeometrySnapshot {
                element: "box".to_string(),
                values: vec![FieldValue {
                    field: GeometryField::Width,
                    value: 200.0,
                }],
            },
        }
    }

    #[test]
    fn console_log_writes_lines() {
        let mut log = ConsoleLog::new(Vec::new());
        log.record(ProbeEvent::Intent {
            phase: Phase::Incremental,
            message: "hello".to_string(),
        })
        .expect("record");
        log.record(geometry_event()).expect("record");
        let text = String::from_utf8(log.into_inner()).expect("utf-8");
        assert_eq!(text, "hello\n#box { width: 200 }\n");
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_value(geometry_event()).expect("json");
        assert_eq!(json["kind"], "geometry");
        assert_eq!(json["phase"], "from-scratch");
        assert_eq!(json["snapshot"]["values"][0]["field"], "width");
        assert_eq!(json["snapshot"]["values"][0]["value"], 200.0);
    }
}
