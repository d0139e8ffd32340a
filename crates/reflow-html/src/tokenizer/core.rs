use strum_macros::Display;

use super::character_reference::match_character_reference;
use super::token::{Attribute, Token};

/// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
///
/// Start tags after which the tokenizer switches into a text-only state.
/// The tree builder normally drives this switch; here the tokenizer does it
/// itself because it runs to completion before tree construction starts.
const RAWTEXT_ELEMENTS: &[&str] = &["style", "script", "xmp", "iframe", "noembed", "noframes"];

/// Text-only elements whose contents still decode character references.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer states we model. RCDATA and script data share the
/// `RAWTEXT*` states, distinguished by the `rcdata` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RAWTEXTLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RAWTEXTEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RAWTEXTEndTagName,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// The comment start, dash and end states are folded into this one.
    Comment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Everything up to `>` is collected; only the name is kept.
    DOCTYPE,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
pub struct HTMLTokenizer {
    state: TokenizerState,
    input: Vec<char>,
    current_pos: usize,
    current_input_character: Option<char>,
    current_token: Option<Token>,
    current_attribute: Option<Attribute>,
    at_eof: bool,
    token_stream: Vec<Token>,
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    rcdata: bool,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,

    /// [§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    temporary_buffer: String,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            state: TokenizerState::Data,
            input: input.chars().collect(),
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            current_attribute: None,
            at_eof: false,
            token_stream: Vec::new(),
            reconsume: false,
            rcdata: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after `run()` to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Current state, for tests and tracing.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Run the state machine until the end-of-file token has been emitted.
    pub fn run(&mut self) {
        while !self.at_eof {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.input.get(self.current_pos).copied();
                if self.current_input_character.is_some() {
                    self.current_pos += 1;
                }
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::RAWTEXT => self.handle_rawtext_state(),
                TokenizerState::RAWTEXTLessThanSign => self.handle_rawtext_less_than_sign_state(),
                TokenizerState::RAWTEXTEndTagOpen => self.handle_rawtext_end_tag_open_state(),
                TokenizerState::RAWTEXTEndTagName => self.handle_rawtext_end_tag_name_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
                TokenizerState::Comment => self.handle_comment_state(),
                TokenizerState::DOCTYPE => self.handle_doctype_state(),
            }
        }
    }

    // ===== state handlers =====

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            Some('&') => {
                let c = self.consume_character_reference(false);
                self.emit_character_token(c);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RAWTEXTLessThanSign),
            // [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
            Some('&') if self.rcdata => {
                let c = self.consume_character_reference(false);
                self.emit_character_token(c);
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_rawtext_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::RAWTEXTEndTagOpen);
        } else {
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the RAWTEXT state."
            self.emit_character_token('<');
            self.reconsume_in(TokenizerState::RAWTEXT);
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn handle_rawtext_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::RAWTEXTEndTagName);
            }
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(TokenizerState::RAWTEXT);
            }
        }
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    fn handle_rawtext_end_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            // "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character token,
            // and a character token for each of the characters in the temporary buffer (in the
            // order they were added to the buffer). Reconsume in the RAWTEXT state."
            _ => {
                self.current_token = None;
                self.emit_character_token('<');
                self.emit_character_token('/');
                let buffered: Vec<char> = self.temporary_buffer.drain(..).collect();
                for c in buffered {
                    self.emit_character_token(c);
                }
                self.reconsume_in(TokenizerState::RAWTEXT);
            }
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.handle_markup_declaration_open(),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token whose data is the empty string. Reconsume in
            // the bogus comment state."
            Some('?') => {
                self.current_token = Some(Token::Comment {
                    data: String::new(),
                });
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - Emit a U+003C LESS-THAN SIGN character token and an end-of-file token."
            None => {
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // data state."
            Some(_) => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-)"
        if self.next_input_starts_with("--", false) {
            self.current_pos += 2;
            self.current_token = Some(Token::Comment {
                data: String::new(),
            });
            self.switch_to(TokenizerState::Comment);
        // "ASCII case-insensitive match for the word "DOCTYPE""
        } else if self.next_input_starts_with("doctype", true) {
            self.current_pos += "doctype".len();
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::DOCTYPE);
        } else {
            // "This is an incorrectly-opened-comment parse error."
            self.current_token = Some(Token::Comment {
                data: String::new(),
            });
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => self.switch_to(TokenizerState::Data),
            None => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            Some(_) => {
                self.current_token = Some(Token::Comment {
                    data: String::new(),
                });
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character to the current tag token's tag name."
            Some(c) => self.append_to_tag_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - Start a new attribute in the current tag token. Set
            // that attribute's name to the current input character"
            Some('=') => {
                self.start_new_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c) => self.append_to_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.emit_eof_token(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value parse error.
            // Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                let c = self.consume_character_reference(true);
                self.append_to_attribute_value(c);
            }
            None => self.emit_eof_token(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('&') => {
                let c = self.consume_character_reference(true);
                self.append_to_attribute_value(c);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.emit_eof_token(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.emit_eof_token(),
            // "This is a missing-whitespace-between-attributes parse error. Reconsume in the
            // before attribute name state."
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                if let Some(Token::StartTag { self_closing, .. }) = self.current_token.as_mut() {
                    *self_closing = true;
                }
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => self.emit_eof_token(),
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => {
                self.emit_current_comment();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
            Some('-') if self.next_input_starts_with("->", false) => {
                self.current_pos += 2;
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current comment token.
            // Emit an end-of-file token."
            None => {
                self.emit_current_comment();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_doctype();
            }
            None => {
                self.emit_doctype();
                self.emit_eof_token();
            }
            Some(c) => self.temporary_buffer.push(c),
        }
    }

    // ===== helpers =====

    fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume = true;
        self.state = state;
    }

    fn next_input_starts_with(&self, expected: &str, ignore_case: bool) -> bool {
        let mut remaining = self.input[self.current_pos..].iter();
        expected.chars().all(|e| {
            remaining.next().is_some_and(|&c| {
                if ignore_case {
                    c.eq_ignore_ascii_case(&e)
                } else {
                    c == e
                }
            })
        })
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called with the `&` already consumed. Returns the decoded character, or
    /// the ampersand itself when nothing matched ("flush code points consumed
    /// as a character reference").
    fn consume_character_reference(&mut self, in_attribute: bool) -> char {
        match match_character_reference(&self.input[self.current_pos..], in_attribute) {
            Some(m) => {
                self.current_pos += m.consumed;
                m.decoded
            }
            None => '&',
        }
    }

    /// "An appropriate end tag token is an end tag token whose tag name matches the
    /// tag name of the last start tag to have been emitted from this tokenizer"
    fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.current_token, &self.last_start_tag_name) {
            (Some(Token::EndTag { name }), Some(last)) => name == last,
            _ => false,
        }
    }

    fn append_to_tag_name(&mut self, c: char) {
        match self.current_token.as_mut() {
            Some(Token::StartTag { name, .. } | Token::EndTag { name }) => name.push(c),
            _ => {}
        }
    }

    fn append_to_comment(&mut self, c: char) {
        if let Some(Token::Comment { data }) = self.current_token.as_mut() {
            data.push(c);
        }
    }

    fn start_new_attribute(&mut self) {
        self.finish_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.name.push(c);
        }
    }

    fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.current_attribute.as_mut() {
            attr.value.push(c);
        }
    }

    /// "When the user agent leaves the attribute name state ... if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    fn finish_attribute(&mut self) {
        let Some(attr) = self.current_attribute.take() else {
            return;
        };
        // Attributes on end tags are dropped.
        if let Some(Token::StartTag { attributes, .. }) = self.current_token.as_mut() {
            if attributes.iter().any(|a| a.name == attr.name) {
                log::debug!("duplicate attribute '{}' dropped", attr.name);
            } else {
                attributes.push(attr);
            }
        }
    }

    fn emit_current_tag(&mut self) {
        self.finish_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };
        if let Token::StartTag { name, .. } = &token {
            let lowered = name.as_str();
            if RAWTEXT_ELEMENTS.contains(&lowered) {
                self.rcdata = false;
                self.switch_to(TokenizerState::RAWTEXT);
            } else if RCDATA_ELEMENTS.contains(&lowered) {
                self.rcdata = true;
                self.switch_to(TokenizerState::RAWTEXT);
            }
            self.last_start_tag_name = Some(name.clone());
        }
        self.token_stream.push(token);
    }

    fn emit_current_comment(&mut self) {
        if let Some(token) = self.current_token.take() {
            self.token_stream.push(token);
        }
    }

    fn emit_doctype(&mut self) {
        let name = self
            .temporary_buffer
            .split_whitespace()
            .next()
            .map(str::to_ascii_lowercase);
        self.temporary_buffer.clear();
        self.token_stream.push(Token::Doctype { name });
    }

    fn emit_character_token(&mut self, data: char) {
        self.token_stream.push(Token::Character { data });
    }

    fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }
}

/// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+0020 SPACE"
const fn is_whitespace_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
