//! Headless page API for the reflow layout probe.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read and parse an HTML file or string
//! - **Style Mutation** - edit single properties of an element's inline style
//! - **Geometry** - `getBoundingClientRect()` backed by the incremental layout cache
//! - **Markup Replacement** - `document.documentElement.innerHTML` get and set
//!
//! # Not Yet Implemented
//!
//! - Network loading and external resources
//! - Script execution

mod error;

pub use error::{LoadError, PageError};
pub use reflow_css as css;
pub use reflow_dom as dom;
pub use reflow_html as html;

use std::fs;
use std::path::Path;

use reflow_common::warning::clear_warnings;
use reflow_css::{DomRect, LayoutEngine, LayoutStats, StyleDeclarations};
use reflow_dom::{DomTree, NodeId};
use reflow_html::{
    HTMLParser, HTMLTokenizer, ParseIssue, dump_tree, inner_html, parse_fragment_into,
};

/// A parsed document plus the layout state that belongs to it.
///
/// All reads and writes go through the page so that layout invalidation
/// stays in step with the tree: style edits mark nodes dirty, markup
/// replacement drops the layout cache, and geometry reads flush first.
#[derive(Debug)]
pub struct Page {
    tree: DomTree,
    layout: LayoutEngine,
    parse_issues: Vec<ParseIssue>,
}

impl Page {
    /// Parse `html` into a new page with the default viewport.
    ///
    /// The page is laid out before it is returned, like a document that has
    /// finished loading, so the first geometry read after a style edit is
    /// served incrementally.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        clear_warnings();
        let mut tokenizer = HTMLTokenizer::new(html);
        tokenizer.run();
        let (tree, parse_issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();
        for issue in &parse_issues {
            log::debug!("parse issue at token {}: {}", issue.token_index, issue.message);
        }
        let mut page = Self {
            tree,
            layout: LayoutEngine::default(),
            parse_issues,
        };
        page.layout_now();
        page
    }

    /// Read and parse an HTML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::FileError`] if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let html = fs::read_to_string(path).map_err(|source| LoadError::FileError {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded {} ({} bytes)", path.display(), html.len());
        Ok(Self::from_html(&html))
    }

    /// Use a viewport of `width` x `height` CSS pixels. The page is laid
    /// out again for the new size.
    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.layout.set_viewport(width, height);
        self.layout_now();
        self
    }

    fn layout_now(&mut self) {
        let _ = self.layout.flush(&self.tree);
    }

    /// The underlying DOM tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Parse errors from the most recent parse of this page's markup.
    #[must_use]
    pub fn parse_issues(&self) -> &[ParseIssue] {
        &self.parse_issues
    }

    /// [§ 4.5 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(element_id)
    }

    /// The `id` attribute of `node`, if it has one.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown, detached or not an element.
    pub fn element_id(&self, node: NodeId) -> Result<Option<&str>, PageError> {
        self.check_element(node)?;
        Ok(self.tree.as_element(node).and_then(|e| e.id()))
    }

    /// `element.style.setProperty(name, value)`: edit one declaration of the
    /// inline style, keeping the others in place, and mark the element for
    /// relayout. An empty `value` removes the property.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown, detached or not an element.
    pub fn set_style_property(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), PageError> {
        self.check_element(node)?;
        let current = self
            .tree
            .as_element(node)
            .and_then(|e| e.style())
            .unwrap_or_default();
        let mut declarations = StyleDeclarations::parse(current);
        declarations.set_property(name, value);
        let serialized = declarations.to_string();
        log::debug!("{node:?} style=\"{serialized}\"");
        let _ = self.tree.set_attribute(node, "style", &serialized);
        self.layout.mark_style_dirty(&self.tree, node);
        Ok(())
    }

    /// [CSSOM View § 6.1 getBoundingClientRect()](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    ///
    /// Flushes pending layout first. After style edits only dirty paths are
    /// laid out again; after markup replacement everything is.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown, detached or not an element.
    pub fn bounding_client_rect(&mut self, node: NodeId) -> Result<DomRect, PageError> {
        self.check_element(node)?;
        self.layout_now();
        Ok(self.layout.client_rect(node))
    }

    /// `document.documentElement.innerHTML` getter.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MissingDocumentElement`] for a document without `<html>`.
    pub fn document_element_inner_html(&self) -> Result<String, PageError> {
        let html = self
            .tree
            .document_element()
            .ok_or(PageError::MissingDocumentElement)?;
        Ok(inner_html(&self.tree, html))
    }

    /// `document.documentElement.innerHTML` setter.
    ///
    /// [§ 3.5.4 innerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-innerhtml)
    ///
    /// "Let fragment be the result of invoking the fragment parsing algorithm
    /// steps with context and compliantString. ... Replace all with fragment
    /// within context."
    ///
    /// Every node beneath `<html>` is detached and replaced by freshly parsed
    /// nodes with new ids, and the whole layout cache is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MissingDocumentElement`] for a document without `<html>`.
    pub fn set_document_element_inner_html(&mut self, markup: &str) -> Result<(), PageError> {
        let html = self
            .tree
            .document_element()
            .ok_or(PageError::MissingDocumentElement)?;
        let removed = self.tree.remove_all_children(html);
        self.parse_issues = parse_fragment_into(&mut self.tree, html, markup);
        self.layout.invalidate_all();
        log::debug!(
            "replaced {} children of the document element, {} parse issues",
            removed.len(),
            self.parse_issues.len()
        );
        Ok(())
    }

    /// Counters from the last layout flush that did work.
    #[must_use]
    pub const fn layout_stats(&self) -> LayoutStats {
        self.layout.stats()
    }

    /// Debug dump of the whole tree.
    #[must_use]
    pub fn dump_tree(&self) -> String {
        dump_tree(&self.tree, NodeId::ROOT)
    }

    fn check_element(&self, node: NodeId) -> Result<(), PageError> {
        if self.tree.get(node).is_none() {
            return Err(PageError::UnknownNode(node));
        }
        if !self.tree.is_connected(node) {
            return Err(PageError::Detached(node));
        }
        if self.tree.as_element(node).is_none() {
            return Err(PageError::NotAnElement(node));
        }
        Ok(())
    }
}
