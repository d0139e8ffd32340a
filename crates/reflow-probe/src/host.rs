//! The document handle a probe runs against.

use std::fmt::Debug;

use reflow_css::DomRect;
use reflow_dom::NodeId;
use reflow_page::Page;

use crate::error::ProbeError;

/// A live document the probe can query, mutate and rebuild.
///
/// Element handles are plain values. After
/// [`replace_document_markup`](Self::replace_document_markup) every handle
/// obtained earlier must either resolve to a different node or fail; it must
/// never read the geometry of the node that was replaced.
pub trait LayoutHost {
    /// Opaque element handle.
    type Element: Copy + Debug + PartialEq;

    /// First connected element with this `id`, in tree order.
    fn get_element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// The element's `id` attribute.
    ///
    /// # Errors
    ///
    /// Fails for handles that no longer resolve.
    fn element_id(&self, element: Self::Element) -> Result<Option<String>, ProbeError>;

    /// `getBoundingClientRect()`, laying out pending changes first.
    ///
    /// # Errors
    ///
    /// Fails for handles that no longer resolve.
    fn bounding_client_rect(&mut self, element: Self::Element) -> Result<DomRect, ProbeError>;

    /// `element.style.setProperty(name, value)`.
    ///
    /// # Errors
    ///
    /// Fails for handles that no longer resolve.
    fn set_style_property(
        &mut self,
        element: Self::Element,
        name: &str,
        value: &str,
    ) -> Result<(), ProbeError>;

    /// `document.documentElement.innerHTML`.
    ///
    /// # Errors
    ///
    /// Fails if the document has no document element.
    fn document_markup(&self) -> Result<String, ProbeError>;

    /// `document.documentElement.innerHTML = markup`.
    ///
    /// # Errors
    ///
    /// Fails if the document has no document element.
    fn replace_document_markup(&mut self, markup: &str) -> Result<(), ProbeError>;
}

impl LayoutHost for Page {
    type Element = NodeId;

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        Self::get_element_by_id(self, id)
    }

    fn element_id(&self, element: NodeId) -> Result<Option<String>, ProbeError> {
        Ok(Self::element_id(self, element)?.map(str::to_string))
    }

    fn bounding_client_rect(&mut self, element: NodeId) -> Result<DomRect, ProbeError> {
        Ok(Self::bounding_client_rect(self, element)?)
    }

    fn set_style_property(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), ProbeError> {
        Ok(Self::set_style_property(self, element, name, value)?)
    }

    fn document_markup(&self) -> Result<String, ProbeError> {
        Ok(self.document_element_inner_html()?)
    }

    fn replace_document_markup(&mut self, markup: &str) -> Result<(), ProbeError> {
        Ok(self.set_document_element_inner_html(markup)?)
    }
}
