//! Errors raised while probing.

use reflow_page::PageError;
use thiserror::Error;

/// Everything that can stop a probe run.
///
/// The sequencer never recovers from any of these: the first failure ends the
/// run and is handed back to the caller.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No connected element carries the requested id.
    #[error("no element with id '{0}'")]
    ElementNotFound(String),
    /// A geometry field name outside `x y width height top right bottom left`.
    #[error("unknown geometry field '{0}'")]
    UnknownField(String),
    /// A style change that does not read as `id:property=value`.
    #[error("invalid style change '{0}', expected id:property=value")]
    InvalidStyleChange(String),
    /// A tracked element that does not read as `id` or `id:field,field`.
    #[error("invalid tracked element '{0}', expected id or id:field,field")]
    InvalidTrackedElement(String),
    /// A comparison tolerance that is negative, infinite or NaN.
    #[error("invalid tolerance {0}, expected a finite number >= 0")]
    InvalidTolerance(f64),
    /// The page rejected an operation.
    #[error(transparent)]
    Page(#[from] PageError),
    /// A mock or foreign host failed.
    #[error("layout host failed: {0}")]
    Host(String),
    /// A mutation hook failed.
    #[error("style mutation failed: {0}")]
    Mutation(String),
    /// Reading a plan or writing probe output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A style-extraction pattern failed to compile.
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// A plan or report could not be (de)serialized.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
