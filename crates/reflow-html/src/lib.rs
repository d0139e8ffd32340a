//! HTML tokenizer, tree builder and serializer for the reflow headless page.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, raw text, tag, attribute, comment and DOCTYPE states
//!   - Named (`amp`, `lt`, `gt`, `quot`, `apos`, `nbsp`) and numeric character references
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Implied `html`, `head` and `body` elements
//!   - Void elements and end tags that close the nearest matching open element
//!   - Fragment parsing for `innerHTML` setters
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Yet Implemented
//!
//! - Table, select and form insertion modes
//! - Foster parenting
//! - Adoption agency algorithm
//! - The full named character reference table

/// HTML tree construction.
pub mod parser;
/// HTML fragment serialization.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{
    HTMLParser, InsertionMode, ParseIssue, dump_tree, parse_document, parse_fragment_into,
};
pub use serializer::{inner_html, outer_html};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};
