//! Element attribute list.
//!
//! [§ 4.9.2 Attr](https://dom.spec.whatwg.org/#concept-element-attribute)
//!
//! "An element has an associated ordered attribute list." Order matters for
//! serialization, so attributes live in a `Vec` rather than a map.

/// Ordered `name -> value` list. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace an existing value in place, or append a new attribute.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// [§ 13.2.5.33](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error and the new attribute must
    /// be removed from the token."
    ///
    /// Returns `false` when the name was already present.
    pub fn insert_if_absent(&mut self, name: String, value: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value));
        true
    }

    /// Remove an attribute, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            let _ = attrs.insert_if_absent(name.into(), value.into());
        }
        attrs
    }
}
