//! Warnings about unsupported features.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML and CSS components when they skip input they do not model.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unsupported unit 'vw' in width: 10vw");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = warning_key(component, message);
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key.clone());

    if should_emit {
        log::warn!(target: "reflow", "{key}");
    }
}

/// Whether this warning has been emitted since the last [`clear_warnings`].
pub fn was_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Clear all recorded warnings (call when loading a new page)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
