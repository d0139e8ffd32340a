use std::fmt::Write as _;

use strum_macros::Display;

use reflow_common::warning::warn_once;
use reflow_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, HTMLTokenizer, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is parsed in the "text" insertion mode.
const TEXT_CONTENT_ELEMENTS: &[&str] = &[
    "title", "textarea", "style", "script", "xmp", "iframe", "noembed", "noframes",
];

/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// Start tags that "close a p element" if one is in button scope.
const CLOSES_P_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul", "h1", "h2", "h3", "h4", "h5", "h6",
    "pre", "listing", "form", "table", "hr",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// "The stack of open elements is said to have an element target node in a
/// specific scope consisting of a list of element types list..."
const SCOPE_BOUNDARIES: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    ///
    /// Also covers "after after body".
    AfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the parse error.
    pub message: String,
    /// Index into the token stream where this error was encountered.
    pub token_index: usize,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
pub struct HTMLParser {
    tokens: Vec<Token>,
}

impl HTMLParser {
    /// Create a parser over an already tokenized input.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Build a complete document.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Build a complete document, also returning the parse errors seen.
    #[must_use]
    pub fn run_with_issues(self) -> (DomTree, Vec<ParseIssue>) {
        let mut tree = DomTree::new();
        let issues = {
            let mut builder = TreeBuilder::for_document(&mut tree);
            builder.run(&self.tokens);
            builder.issues
        };
        (tree, issues)
    }

    /// [§ 13.2.8 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Parse the tokens as a fragment in the context of `context` and append
    /// the resulting nodes to it. Existing children are left alone; callers
    /// implementing an `innerHTML` setter remove them first.
    pub fn run_fragment(self, tree: &mut DomTree, context: NodeId) -> Vec<ParseIssue> {
        let context_tag = tree
            .as_element(context)
            .map(|e| e.tag_name.to_ascii_lowercase())
            .unwrap_or_default();

        // "Let root be the result of creating an element given document, "html""
        let root = tree.alloc(NodeType::Element(ElementData::new("html")));
        let issues = {
            let mut builder = TreeBuilder::for_fragment(tree, root, &context_tag);
            builder.run(&self.tokens);
            builder.issues
        };

        // "Return root's children, in tree order."
        for child in tree.remove_all_children(root) {
            tree.append_child(context, child);
        }
        issues
    }
}

/// Tokenize and parse a full document.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}

/// Tokenize `html` and append it to `context` as a fragment.
pub fn parse_fragment_into(tree: &mut DomTree, context: NodeId, html: &str) -> Vec<ParseIssue> {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run_fragment(tree, context)
}

struct TreeBuilder<'a> {
    tree: &'a mut DomTree,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.2 The original insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    html_element: Option<NodeId>,
    body_element: Option<NodeId>,

    token_index: usize,
    stopped: bool,
    issues: Vec<ParseIssue>,
}

impl<'a> TreeBuilder<'a> {
    const fn for_document(tree: &'a mut DomTree) -> Self {
        Self {
            tree,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            html_element: None,
            body_element: None,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
        }
    }

    /// [§ 13.2.8](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// "Set up the parser's stack of open elements so that it contains just the
    /// single element root." then "Reset the parser's insertion mode appropriately."
    fn for_fragment(tree: &'a mut DomTree, root: NodeId, context_tag: &str) -> Self {
        let mut builder = Self::for_document(tree);
        builder.stack_of_open_elements.push(root);
        builder.html_element = Some(root);
        // [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
        // "If node is an html element ... If the head element pointer is null,
        // switch the insertion mode to "before head""
        builder.insertion_mode = match context_tag {
            "html" => InsertionMode::BeforeHead,
            "head" => InsertionMode::InHead,
            _ => InsertionMode::InBody,
        };
        builder
    }

    fn run(&mut self, tokens: &[Token]) {
        while !self.stopped && self.token_index < tokens.len() {
            self.process_token(&tokens[self.token_index]);
            self.token_index += 1;
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn process_token(&mut self, token: &Token) {
        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
        }
    }

    fn switch_to(&mut self, mode: InsertionMode) {
        log::trace!("insertion mode {} -> {mode}", self.insertion_mode);
        self.insertion_mode = mode;
    }

    fn parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }

    // ===== insertion modes =====

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 ... U+0020 SPACE - Ignore the token."
            t if t.is_whitespace_character() => {}
            Token::Comment { data } => self.insert_comment_at(NodeId::ROOT, data),
            // "A DOCTYPE token ... Then, switch the insertion mode to "before html"."
            Token::Doctype { name } => {
                if name.as_deref() != Some("html") {
                    warn_once("HTML", "non-html DOCTYPE; quirks mode is not modelled");
                }
                self.switch_to(InsertionMode::BeforeHtml);
            }
            _ => {
                self.switch_to(InsertionMode::BeforeHtml);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE before html"),
            Token::Comment { data } => self.insert_comment_at(NodeId::ROOT, data),
            t if t.is_whitespace_character() => {}
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element(name, attributes);
                self.tree.append_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.html_element = Some(html);
                self.switch_to(InsertionMode::BeforeHead);
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error("unexpected end tag before html");
            }
            _ => {
                let html = self.create_element("html", &[]);
                self.tree.append_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.html_element = Some(html);
                self.switch_to(InsertionMode::BeforeHead);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            t if t.is_whitespace_character() => {}
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE before head"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_html_element(name, attributes);
                self.head_element_pointer = Some(head);
                self.switch_to(InsertionMode::InHead);
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error("unexpected end tag before head");
            }
            _ => {
                let head = self.insert_html_element("head", &[]);
                self.head_element_pointer = Some(head);
                self.switch_to(InsertionMode::InHead);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in head"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link"
            // - Insert an HTML element for the token. Immediately pop the current node off
            // the stack of open elements."
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack_of_open_elements.pop();
            }
            // "A start tag whose tag name is "title" / "noframes", "style" / "script"
            // - Follow the generic raw text element parsing algorithm."
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "title" | "noframes" | "style" | "script") => {
                self.insert_text_content_element(name, attributes);
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("nested head start tag ignored");
            }
            // "An end tag whose tag name is "head" - Pop the current node (which will be
            // the head element) off the stack of open elements. Switch the insertion mode
            // to "after head"."
            Token::EndTag { name } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::AfterHead);
            }
            Token::EndTag { name } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error("unexpected end tag in head");
            }
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::AfterHead);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if token.is_whitespace_character() => {
                self.insert_character(*data);
            }
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after head"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::StartTag {
                name, attributes, ..
            } if name == "body" => {
                let body = self.insert_html_element(name, attributes);
                self.body_element = Some(body);
                self.switch_to(InsertionMode::InBody);
            }
            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
            // "meta", "noframes", "script", "style", "template", "title" - Parse error. Push
            // the node pointed to by the head element pointer onto the stack of open
            // elements. Process the token using the rules for the "in head" insertion mode.
            // Remove the node pointed to by the head element pointer from the stack of open
            // elements."
            Token::StartTag { name, .. } if is_head_content(name) => {
                self.parse_error("head content after head");
                if let Some(head) = self.head_element_pointer {
                    self.stack_of_open_elements.push(head);
                    self.handle_in_head_mode(token);
                    self.stack_of_open_elements.retain(|&id| id != head);
                }
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("second head start tag ignored");
            }
            Token::EndTag { name } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error("unexpected end tag after head");
            }
            _ => {
                let body = self.insert_html_element("body", &[]);
                self.body_element = Some(body);
                self.switch_to(InsertionMode::InBody);
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in body"),
            // "A start tag whose tag name is "html" - Parse error. ... for each attribute on
            // the token, check to see if the attribute is already present on the top element
            // of the stack of open elements. If it is not, add the attribute and its
            // corresponding value to that element."
            Token::StartTag { name, attributes, .. } if name == "html" => {
                self.parse_error("unexpected html start tag");
                if let Some(html) = self.html_element {
                    self.merge_attributes(html, attributes);
                }
            }
            Token::StartTag { name, .. } if is_head_content(name) => {
                self.handle_in_head_mode(token);
            }
            Token::StartTag { name, attributes, .. } if name == "body" => {
                self.parse_error("unexpected body start tag");
                if let Some(body) = self.body_element {
                    self.merge_attributes(body, attributes);
                }
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("head start tag in body ignored");
            }
            Token::StartTag {
                name, attributes, ..
            } => {
                if CLOSES_P_ELEMENTS.contains(&name.as_str()) && self.has_p_element_in_button_scope()
                {
                    self.close_p_element();
                }
                if TEXT_CONTENT_ELEMENTS.contains(&name.as_str()) {
                    self.insert_text_content_element(name, attributes);
                } else {
                    let _ = self.insert_html_element(name, attributes);
                    // "Insert an HTML element for the token. Immediately pop the current
                    // node off the stack of open elements."
                    if VOID_ELEMENTS.contains(&name.as_str()) {
                        let _ = self.stack_of_open_elements.pop();
                    }
                }
            }
            // "An end tag whose tag name is "body" - If the stack of open elements does not
            // have a body element in scope, this is a parse error; ignore the token.
            // Otherwise ... Switch the insertion mode to "after body"."
            Token::EndTag { name } if name == "body" || name == "html" => {
                if self.has_element_in_scope("body", false) {
                    self.switch_to(InsertionMode::AfterBody);
                } else {
                    self.parse_error("body end tag without body in scope");
                }
            }
            // "An end tag whose tag name is "p" - If the stack of open elements does not have
            // a p element in button scope, then this is a parse error; insert an HTML element
            // for a "p" start tag token with no attributes. Close a p element."
            Token::EndTag { name } if name == "p" => {
                if !self.has_p_element_in_button_scope() {
                    self.parse_error("p end tag without open p");
                    let _ = self.insert_html_element("p", &[]);
                }
                self.close_p_element();
            }
            Token::EndTag { name } => self.handle_any_other_end_tag(name),
            // "An end-of-file token - ... Stop parsing."
            Token::EndOfFile => self.stopped = true,
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.insert_character(*data),
            // "An end-of-file token - Parse error. ... Pop the current node off the stack of
            // open elements. Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                self.parse_error("eof in text content");
                let _ = self.stack_of_open_elements.pop();
                self.restore_original_insertion_mode();
                self.process_token(token);
            }
            // "Any other end tag - Pop the current node off the stack of open elements.
            // Switch the insertion mode to the original insertion mode."
            _ => {
                let _ = self.stack_of_open_elements.pop();
                self.restore_original_insertion_mode();
            }
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            t if t.is_whitespace_character() => self.handle_in_body_mode(token),
            // "A comment token - Insert a comment as the last child of the first element in
            // the stack of open elements (the html element)."
            Token::Comment { data } => {
                let target = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_at(target, data);
            }
            Token::EndTag { name } if name == "html" => {}
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after body");
                self.switch_to(InsertionMode::InBody);
                self.process_token(token);
            }
        }
    }

    // ===== tree helpers =====

    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn tag_of(&self, id: NodeId) -> &str {
        self.tree
            .as_element(id)
            .map_or("", |e| e.tag_name.as_str())
    }

    fn create_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let attrs: Attributes = attributes
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let element = self.create_element(name, attributes);
        let parent = self.current_node();
        self.tree.append_child(parent, element);
        self.stack_of_open_elements.push(element);
        element
    }

    /// [§ 13.2.6.2 Generic raw text / RCDATA element parsing](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "Let the original insertion mode be the current insertion mode. Then, switch
    /// the insertion mode to "text"."
    fn insert_text_content_element(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_html_element(name, attributes);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.switch_to(InsertionMode::Text);
    }

    fn restore_original_insertion_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion location,
    /// then append data to that Text node's data. Otherwise, create a new Text node."
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        // "If the adjusted insertion location is in a Document node, then return."
        if parent == NodeId::ROOT {
            return;
        }
        if let Some(last) = self.tree.children(parent).last().copied() {
            if let Some(node) = self.tree.get_mut(last) {
                if let NodeType::Text(text) = &mut node.node_type {
                    text.push(c);
                    return;
                }
            }
        }
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.tree.append_child(parent, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str) {
        let parent = self.current_node();
        self.insert_comment_at(parent, data);
    }

    fn insert_comment_at(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    fn merge_attributes(&mut self, target: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(target) {
            for attr in attributes {
                let _ = element
                    .attrs
                    .insert_if_absent(attr.name.clone(), attr.value.clone());
            }
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    fn has_element_in_scope(&self, tag: &str, button_scope: bool) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let node_tag = self.tag_of(id);
            if node_tag == tag {
                return true;
            }
            if SCOPE_BOUNDARIES.contains(&node_tag) || (button_scope && node_tag == "button") {
                return false;
            }
        }
        false
    }

    fn has_p_element_in_button_scope(&self) -> bool {
        self.has_element_in_scope("p", true)
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    fn generate_implied_end_tags(&mut self, except: &str) {
        loop {
            let tag = self.tag_of(self.current_node());
            if tag == except || !IMPLIED_END_TAGS.contains(&tag) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. ... Pop elements from the
    /// stack of open elements until a p element has been popped from the stack."
    fn close_p_element(&mut self) {
        self.generate_implied_end_tags("p");
        self.pop_until("p");
    }

    fn pop_until(&mut self, tag: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.tag_of(id) == tag {
                break;
            }
        }
    }

    /// [§ 13.2.6.4.7 "Any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    /// 2. Loop: If node is an HTML element with the same tag name as the token, then:
    ///    Generate implied end tags, except for HTML elements with the same tag name
    ///    as the token. ... Pop all the nodes from the current node up to node,
    ///    including node, then stop these steps.
    /// 3. Otherwise, if node is in the special category, then this is a parse error;
    ///    ignore the token, and return."
    fn handle_any_other_end_tag(&mut self, name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let id = self.stack_of_open_elements[index];
            let tag = self.tag_of(id);
            if tag == name {
                self.generate_implied_end_tags(name);
                self.stack_of_open_elements.truncate(index);
                return;
            }
            if is_special(tag) || Some(id) == self.html_element {
                break;
            }
        }
        self.parse_error("end tag without matching open element");
    }
}

fn is_head_content(name: &str) -> bool {
    matches!(
        name,
        "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title"
    )
}

/// [§ 13.2.4.3 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// A trimmed copy of the special category, enough to stop end tags from
/// escaping structural containers.
fn is_special(tag: &str) -> bool {
    matches!(
        tag,
        "address" | "article" | "aside" | "blockquote" | "body" | "button" | "center"
            | "dd" | "details" | "dialog" | "div" | "dl" | "dt" | "fieldset" | "figure"
            | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head"
            | "header" | "html" | "li" | "main" | "nav" | "ol" | "p" | "section"
            | "table" | "td" | "th" | "tr" | "ul"
    )
}

/// Debug dump of a subtree, one node per line, indented by depth.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, id, 0, &mut out);
    out
}

fn dump_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else { return };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document"),
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.to_string()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child_id in tree.children(id) {
        dump_node(tree, child_id, indent + 1, out);
    }
}
