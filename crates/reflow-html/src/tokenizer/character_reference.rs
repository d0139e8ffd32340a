//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Only the handful of named references that markup produced by the
//! serializer can contain are recognised, plus all numeric references.

/// Named references we decode, longest names first so that prefix matching
/// stays unambiguous.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("nbsp", '\u{00A0}'),
    ("quot", '"'),
    ("apos", '\''),
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
];

/// Result of matching a reference after the `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterReferenceMatch {
    /// The decoded character.
    pub decoded: char,
    /// Number of input characters consumed after the ampersand.
    pub consumed: usize,
}

/// Try to match a character reference at the start of `rest` (the input
/// immediately after `&`).
///
/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "If the character reference was consumed as part of an attribute, and the
/// last character matched is not a U+003B SEMICOLON character (;), and the
/// next input character is either a U+003D EQUALS SIGN character (=) or an
/// ASCII alphanumeric, then, for historical reasons, flush code points
/// consumed as a character reference and switch to the return state."
#[must_use]
pub fn match_character_reference(rest: &[char], in_attribute: bool) -> Option<CharacterReferenceMatch> {
    match rest.first() {
        Some('#') => match_numeric_reference(rest),
        Some(c) if c.is_ascii_alphanumeric() => match_named_reference(rest, in_attribute),
        _ => None,
    }
}

fn match_named_reference(rest: &[char], in_attribute: bool) -> Option<CharacterReferenceMatch> {
    for &(name, decoded) in NAMED_REFERENCES {
        let len = name.chars().count();
        if rest.len() < len || !rest[..len].iter().copied().eq(name.chars()) {
            continue;
        }
        if rest.get(len) == Some(&';') {
            return Some(CharacterReferenceMatch {
                decoded,
                consumed: len + 1,
            });
        }
        let next = rest.get(len);
        if in_attribute && next.is_some_and(|c| *c == '=' || c.is_ascii_alphanumeric()) {
            return None;
        }
        return Some(CharacterReferenceMatch {
            decoded,
            consumed: len,
        });
    }
    None
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
fn match_numeric_reference(rest: &[char]) -> Option<CharacterReferenceMatch> {
    let (radix, digits_start) = match rest.get(1) {
        Some('x' | 'X') => (16, 2),
        _ => (10, 1),
    };
    let digits: String = rest[digits_start..]
        .iter()
        .take_while(|c| c.is_digit(radix))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let mut consumed = digits_start + digits.chars().count();
    if rest.get(consumed) == Some(&';') {
        consumed += 1;
    }

    // [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    // "If the number is 0x00 ... or greater than 0x10FFFF ... or a surrogate,
    // set the character reference code to 0xFFFD."
    let decoded = u32::from_str_radix(&digits, radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}');
    Some(CharacterReferenceMatch { decoded, consumed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_named_with_semicolon() {
        let m = match_character_reference(&chars("amp;rest"), false).unwrap();
        assert_eq!(m.decoded, '&');
        assert_eq!(m.consumed, 4);
    }

    #[test]
    fn test_named_without_semicolon_in_attribute_is_literal() {
        assert_eq!(match_character_reference(&chars("ampx"), true), None);
        assert!(match_character_reference(&chars("amp "), true).is_some());
    }

    #[test]
    fn test_numeric_decimal_and_hex() {
        let dec = match_character_reference(&chars("#65;"), false).unwrap();
        assert_eq!(dec.decoded, 'A');
        assert_eq!(dec.consumed, 4);

        let hex = match_character_reference(&chars("#x41"), false).unwrap();
        assert_eq!(hex.decoded, 'A');
        assert_eq!(hex.consumed, 4);
    }

    #[test]
    fn test_numeric_invalid_code_point_replaced() {
        let m = match_character_reference(&chars("#0;"), false).unwrap();
        assert_eq!(m.decoded, '\u{FFFD}');
    }

    #[test]
    fn test_unknown_reference() {
        assert_eq!(match_character_reference(&chars("bogus;"), false), None);
        assert_eq!(match_character_reference(&chars(" "), false), None);
    }
}
