//! Probe plans: a JSON description of one probe run.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "changes": [{ "element": "box", "property": "width", "value": "200px" }],
//!   "track": [{ "id": "box", "fields": ["width", "height"] }]
//! }
//! ```
//!
//! Unknown keys and unknown geometry field names are rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::hooks::{StyleChange, StyleChanges};
use crate::sequencer::{ProbeSequencer, TrackedElement};

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Everything a probe run needs besides the page itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbePlan {
    /// Viewport to lay the page out in; the page default when absent.
    pub viewport: Option<Viewport>,
    /// Style changes making up the mutation, applied in order.
    pub changes: Vec<StyleChange>,
    /// Elements to report on.
    pub track: Vec<TrackedElement>,
}

impl ProbePlan {
    /// Parse a plan from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Json`] for malformed plans.
    pub fn from_json(json: &str) -> Result<Self, ProbeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Io`] if the file cannot be read and
    /// [`ProbeError::Json`] if it is not a valid plan.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Serialization of plans does not fail in practice; the error is passed on.
    pub fn to_json(&self) -> Result<String, ProbeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A sequencer applying this plan's changes and tracking its elements.
    #[must_use]
    pub fn into_sequencer(self) -> ProbeSequencer<StyleChanges> {
        ProbeSequencer::new(StyleChanges(self.changes), self.track)
    }
}
