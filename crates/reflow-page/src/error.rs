use std::path::PathBuf;

use reflow_dom::NodeId;
use thiserror::Error;

/// Failures of page operations on a specific node or on the document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The id was never handed out by this page's tree.
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    /// The node was removed from the document, for example by replacing the
    /// markup it came from.
    #[error("node {0:?} is no longer connected to the document")]
    Detached(NodeId),
    /// Style and geometry only exist for elements.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// The document has no `<html>` element to read or replace markup under.
    #[error("document has no document element")]
    MissingDocumentElement,
}

/// Error type for page loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file
    #[error("failed to read '{}': {source}", .path.display())]
    FileError {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
