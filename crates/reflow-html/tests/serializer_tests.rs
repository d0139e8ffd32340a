//! Integration tests for HTML fragment serialization.

use reflow_dom::DomTree;
use reflow_html::{inner_html, outer_html, parse_document, parse_fragment_into};

fn document_inner_html(tree: &DomTree) -> String {
    let html = tree.document_element().expect("html element");
    inner_html(tree, html)
}

#[test]
fn test_inner_html_of_document_element() {
    let tree = parse_document(r#"<div id="box" style="width: 100px"></div>"#);
    assert_eq!(
        document_inner_html(&tree),
        r#"<head></head><body><div id="box" style="width: 100px"></div></body>"#
    );
}

#[test]
fn test_void_elements_have_no_end_tag() {
    let tree = parse_document("<p>a<br>b<img src=x></p>");
    let p = tree
        .descendants(tree.root())
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "p"))
        .expect("p");
    assert_eq!(outer_html(&tree, p), r#"<p>a<br>b<img src="x"></p>"#);
}

#[test]
fn test_text_and_attributes_are_escaped() {
    let tree = parse_document(r#"<span title="a &quot;b&quot; &amp; c">1 &lt; 2</span>"#);
    let span = tree
        .descendants(tree.root())
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "span"))
        .expect("span");
    assert_eq!(
        outer_html(&tree, span),
        r#"<span title="a &quot;b&quot; &amp; c">1 &lt; 2</span>"#
    );
}

#[test]
fn test_style_text_is_literal() {
    let tree = parse_document("<style>a > b { }</style>");
    assert_eq!(
        document_inner_html(&tree),
        "<head><style>a > b { }</style></head><body></body>"
    );
}

#[test]
fn test_comments_round_trip() {
    let tree = parse_document("<body><!--keep--></body>");
    assert_eq!(
        document_inner_html(&tree),
        "<head></head><body><!--keep--></body>"
    );
}

#[test]
fn test_reparse_of_inner_html_is_stable() {
    let source = r#"<head><title>t</title></head><body>
<div id="a" style="width: 200px; height: 10px"><p>x<br>y</p></div>
<!-- c --><span>&amp;</span></body>"#;
    let mut tree = parse_document(source);
    let first = document_inner_html(&tree);

    let html = tree.document_element().expect("html");
    let _ = tree.remove_all_children(html);
    let issues = parse_fragment_into(&mut tree, html, &first);
    assert!(issues.is_empty(), "{issues:?}");

    assert_eq!(document_inner_html(&tree), first);
}
