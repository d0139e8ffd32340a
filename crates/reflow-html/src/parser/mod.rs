//! HTML parser module for tree construction.

/// HTML tree builder implementation.
pub mod core;

pub use self::core::{
    HTMLParser, InsertionMode, ParseIssue, dump_tree, parse_document, parse_fragment_into,
};
