//! The layout probe.
//!
//! A probe run brackets a style mutation with geometry reads and then
//! rebuilds the whole document from its own markup:
//!
//! 1. log "Make changes and perform incremental layout"
//! 2. apply the style mutation ([`ProbeHooks::apply_mutation`])
//! 3. report the geometry of every tracked element
//! 4. log "Perform from scratch layout, below values should differ from above"
//! 5. write the document element's markup back onto itself ([`rebuild_from_scratch`])
//! 6. report the geometry of every tracked element again
//!
//! Reading geometry after step 2 lets the host lay out incrementally;
//! reading it after step 5 forces a full layout. If the two reports differ,
//! the host's incremental layout is wrong, which is what [`LayoutVerdict`]
//! checks for.
//!
//! The probe never talks to a global document. Everything goes through a
//! [`LayoutHost`], implemented here for [`reflow_page::Page`] and easily
//! mocked in tests.

/// Errors raised while probing.
pub mod error;
/// Style-assignment extraction from bug-report pages.
pub mod extract;
/// Geometry fields, snapshots and the geometry reporter.
pub mod geometry;
/// Style mutation hooks.
pub mod hooks;
/// The document handle the probe works against.
pub mod host;
/// JSON probe plans.
pub mod plan;
/// The from-scratch rebuild.
pub mod rebuild;
/// The probe sequence.
pub mod sequencer;
/// Output sinks for probe events.
pub mod sink;
/// Incremental versus from-scratch comparison.
pub mod verdict;

pub use error::ProbeError;
pub use geometry::{FieldValue, GeometryField, GeometrySnapshot, console_number, report_geometry};
pub use hooks::{FnHooks, ProbeHooks, StyleChange, StyleChanges};
pub use host::LayoutHost;
pub use plan::{ProbePlan, Viewport};
pub use rebuild::rebuild_from_scratch;
pub use sequencer::{FROM_SCRATCH_INTENT, INCREMENTAL_INTENT, ProbeSequencer, TrackedElement};
pub use sink::{ConsoleLog, Phase, ProbeEvent, ProbeLog};
pub use verdict::{GeometryDifference, LayoutVerdict};
