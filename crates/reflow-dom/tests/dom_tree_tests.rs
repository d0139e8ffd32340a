//! Tests for DOM tree mutation and lookup: append, remove, connectedness, ids.

use reflow_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Helper to create an element carrying an id attribute.
fn alloc_with_id(tree: &mut DomTree, tag: &str, id: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: [("id", id)].into_iter().collect(),
    }))
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_not_a_child_is_noop() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, parent);

    tree.remove_child(parent, stranger);

    assert!(tree.children(parent).is_empty());
}

#[test]
fn test_remove_all_children_returns_in_order() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    let removed = tree.remove_all_children(parent);

    assert_eq!(removed, vec![a, b]);
    assert!(tree.children(parent).is_empty());
    assert!(!tree.is_connected(a));
}

// ========== append_child ==========

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);
    tree.append_child(first, child);

    tree.append_child(second, child);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

// ========== connectedness and identity ==========

#[test]
fn test_detached_subtree_is_not_connected() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let leaf = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, leaf);
    assert!(tree.is_connected(leaf));

    tree.remove_child(html, body);

    assert!(!tree.is_connected(body));
    assert!(!tree.is_connected(leaf));
    assert!(tree.is_connected(html));
}

#[test]
fn test_ids_are_never_reused() {
    let mut tree = DomTree::new();
    let old = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, old);
    tree.remove_child(NodeId::ROOT, old);

    let fresh = alloc_element(&mut tree, "div");

    assert_ne!(old, fresh);
    assert!(tree.get(old).is_some());
}

// ========== lookup ==========

#[test]
fn test_get_element_by_id_first_in_tree_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let outer = alloc_with_id(&mut tree, "div", "dup");
    let inner = alloc_with_id(&mut tree, "span", "dup");
    let later = alloc_with_id(&mut tree, "p", "dup");
    tree.append_child(html, outer);
    tree.append_child(outer, inner);
    tree.append_child(html, later);

    assert_eq!(tree.get_element_by_id("dup"), Some(outer));
}

#[test]
fn test_get_element_by_id_skips_detached() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let target = alloc_with_id(&mut tree, "div", "box");
    tree.append_child(html, target);
    tree.remove_child(html, target);

    assert_eq!(tree.get_element_by_id("box"), None);
    assert_eq!(tree.get_element_by_id(""), None);
}

#[test]
fn test_document_element_and_body() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("lead".to_string()));
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "BODY");
    tree.append_child(NodeId::ROOT, comment);
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_descendants_pre_order() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    let d = alloc_element(&mut tree, "d");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(a, b);
    tree.append_child(b, c);
    tree.append_child(a, d);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();

    assert_eq!(order, vec![NodeId::ROOT, a, b, c, d]);
}

// ========== attributes ==========

#[test]
fn test_set_attribute_preserves_order() {
    let mut tree = DomTree::new();
    let div = alloc_with_id(&mut tree, "div", "box");
    assert!(tree.set_attribute(div, "style", "width: 1px;"));
    assert!(tree.set_attribute(div, "id", "renamed"));

    let attrs: Vec<(&str, &str)> = tree.as_element(div).unwrap().attrs.iter().collect();
    assert_eq!(attrs, vec![("id", "renamed"), ("style", "width: 1px;")]);
}

#[test]
fn test_set_attribute_on_text_fails() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    assert!(!tree.set_attribute(text, "id", "x"));
}

#[test]
fn test_attributes_duplicate_insert_rejected() {
    let mut attrs = Attributes::new();
    assert!(attrs.insert_if_absent("class".to_string(), "a".to_string()));
    assert!(!attrs.insert_if_absent("class".to_string(), "b".to_string()));
    assert_eq!(attrs.get("class"), Some("a"));
    assert_eq!(attrs.remove("class"), Some("a".to_string()));
    assert!(attrs.is_empty());
}
