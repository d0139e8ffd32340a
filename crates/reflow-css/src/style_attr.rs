//! [CSS Style Attributes](https://www.w3.org/TR/css-style-attr/)
//!
//! "The value of the style attribute must match the syntax of the contents of
//! a CSS declaration block (excluding the delimiting braces)."
//!
//! [`StyleDeclarations`] keeps declarations in source order so that editing one
//! property and serializing the block back leaves every other declaration
//! where it was. That property is what lets a page rebuilt from its own markup
//! come back with the same styles.

use std::fmt;

/// A single `name: value` pair from a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, ASCII-lowercased.
    pub name: String,
    /// Value text with surrounding whitespace and `!important` removed.
    pub value: String,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

/// [§ 6.6 CSS declaration blocks](https://drafts.csswg.org/cssom/#css-declaration-blocks)
///
/// "A CSS declaration block is an ordered collection of CSS properties with
/// their associated values, also named CSS declarations."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    declarations: Vec<Declaration>,
}

impl StyleDeclarations {
    /// Parse the contents of a `style` attribute. Malformed declarations
    /// (no colon, empty name or empty value) are skipped.
    ///
    /// "If the same property appears more than once, the last one wins" is
    /// applied here: later duplicates replace the earlier entry.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut block = Self::default();
        for raw in split_declarations(input) {
            let Some((name, value)) = raw.split_once(':') else {
                if !raw.trim().is_empty() {
                    log::debug!("skipping malformed declaration '{}'", raw.trim());
                }
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let (value, important) = strip_important(value.trim());
            if name.is_empty() || value.is_empty() {
                continue;
            }
            block.upsert(Declaration {
                name,
                value: value.to_string(),
                important,
            });
        }
        block
    }

    /// [§ 6.6.1 setProperty()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// "If value is the empty string, invoke removeProperty() with property as
    /// argument and return." Otherwise an existing declaration is updated in
    /// place and a new one is appended at the end.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let (value, important) = strip_important(value.trim());
        if value.is_empty() {
            let _ = self.remove_property(&name);
            return;
        }
        self.upsert(Declaration {
            name,
            value: value.to_string(),
            important,
        });
    }

    /// [§ 6.6.1 removeProperty()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-removeproperty)
    ///
    /// Returns the removed value, if the property was present.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let index = self
            .declarations
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))?;
        Some(self.declarations.remove(index).value)
    }

    /// [§ 6.6.1 getPropertyValue()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-getpropertyvalue)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.value.as_str())
    }

    /// Declarations in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the block has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn upsert(&mut self, declaration: Declaration) {
        if let Some(existing) = self
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
        {
            *existing = declaration;
        } else {
            self.declarations.push(declaration);
        }
    }
}

/// [§ 6.7.2 Serializing CSS values](https://drafts.csswg.org/cssom/#serialize-a-css-declaration-block)
///
/// Declarations are joined as `name: value;` separated by single spaces,
/// the same shape browsers write back into the `style` attribute.
impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {}", d.name, d.value)?;
            if d.important {
                f.write_str(" !important")?;
            }
            f.write_str(";")?;
        }
        Ok(())
    }
}

/// Split on `;` outside of quotes and parentheses (`url(a;b)` stays whole).
fn split_declarations(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn strip_important(value: &str) -> (&str, bool) {
    let lower = value.to_ascii_lowercase();
    if let Some(bang) = lower.rfind('!') {
        if lower[bang + 1..].trim() == "important" {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

#[cfg(test)]
mod tests {
    use super::StyleDeclarations;

    #[test]
    fn set_property_replaces_in_place() {
        let mut block = StyleDeclarations::parse("width: 100px; height: 50px");
        block.set_property("width", "200px");
        assert_eq!(block.to_string(), "width: 200px; height: 50px;");
    }

    #[test]
    fn set_property_appends_new_names() {
        let mut block = StyleDeclarations::parse("height: 50px;");
        block.set_property("Margin-Left", "4px");
        assert_eq!(block.to_string(), "height: 50px; margin-left: 4px;");
    }

    #[test]
    fn empty_value_removes() {
        let mut block = StyleDeclarations::parse("width: 1px; color: red");
        block.set_property("width", "");
        assert_eq!(block.to_string(), "color: red;");
    }

    #[test]
    fn semicolons_inside_parens_and_quotes_do_not_split() {
        let block = StyleDeclarations::parse(
            "background: url(a;b); content: \"x;y\"; width: 3px !important",
        );
        assert_eq!(block.len(), 3);
        assert_eq!(block.get("content"), Some("\"x;y\""));
        assert_eq!(block.get("width"), Some("3px"));
        assert!(block.iter().any(|d| d.important));
    }

    #[test]
    fn later_duplicate_wins_and_malformed_are_skipped() {
        let block = StyleDeclarations::parse("width: 1px; nonsense; width: 2px; :4px; height:");
        assert_eq!(block.to_string(), "width: 2px;");
    }
}
