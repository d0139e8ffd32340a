//! The from-scratch rebuild.

use crate::error::ProbeError;
use crate::host::LayoutHost;

/// Full-tree rebuilder: `document.documentElement.innerHTML =
/// document.documentElement.innerHTML`.
///
/// Every node beneath the document element is thrown away and parsed again
/// from the serialized markup, so the next geometry read cannot reuse any
/// incremental layout state. Element handles taken before the call no longer
/// resolve; re-query them by id.
///
/// # Errors
///
/// Fails if the host has no document element.
pub fn rebuild_from_scratch<H: LayoutHost + ?Sized>(host: &mut H) -> Result<(), ProbeError> {
    let markup = host.document_markup()?;
    log::debug!("rebuilding document from {} bytes of markup", markup.len());
    host.replace_document_markup(&markup)
}
