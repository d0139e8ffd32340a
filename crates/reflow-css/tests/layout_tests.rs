//! Integration tests for block layout and the incremental layout cache.

use reflow_css::{DomRect, LayoutEngine};
use reflow_dom::{DomTree, NodeId};
use reflow_html::parse_document;

fn laid_out(html: &str) -> (DomTree, LayoutEngine) {
    let tree = parse_document(html);
    let mut engine = LayoutEngine::new(800.0, 600.0);
    assert!(engine.flush(&tree));
    (tree, engine)
}

fn rect(tree: &DomTree, engine: &LayoutEngine, id: &str) -> DomRect {
    let node = tree.get_element_by_id(id).expect("element with id");
    engine.client_rect(node)
}

fn set_style(tree: &mut DomTree, engine: &mut LayoutEngine, id: &str, style: &str) -> NodeId {
    let node = tree.get_element_by_id(id).expect("element with id");
    assert!(tree.set_attribute(node, "style", style));
    engine.mark_style_dirty(tree, node);
    node
}

#[test]
fn test_body_margin_offsets_first_box() {
    let (tree, engine) = laid_out(r#"<div id="box" style="width: 100px; height: 50px"></div>"#);
    assert_eq!(rect(&tree, &engine, "box"), DomRect::new(8.0, 8.0, 100.0, 50.0));
}

#[test]
fn test_auto_width_fills_containing_block() {
    let (tree, engine) = laid_out(r#"<div id="box" style="height: 10px"></div>"#);
    assert_eq!(rect(&tree, &engine, "box").width, 784.0);
}

#[test]
fn test_padding_and_border_grow_content_box() {
    let (tree, engine) = laid_out(
        r#"<div id="c" style="width: 100px; padding: 10px; border: 2px solid black"></div>
           <div id="b" style="box-sizing: border-box; width: 100px; padding: 10px; border: 2px solid"></div>"#,
    );
    let content_box = rect(&tree, &engine, "c");
    assert_eq!(content_box.width, 124.0);
    assert_eq!(content_box.height, 24.0);
    assert_eq!(rect(&tree, &engine, "b").width, 100.0);
}

#[test]
fn test_siblings_stack_without_margin_collapsing() {
    let (tree, engine) = laid_out(
        r#"<div id="a" style="height: 50px; margin-bottom: 10px"></div><div id="b" style="height: 30px; margin-top: 5px"></div>"#,
    );
    let b = rect(&tree, &engine, "b");
    assert_eq!(b.y, 8.0 + 50.0 + 10.0 + 5.0);
    assert_eq!(b.bottom, b.y + 30.0);
}

#[test]
fn test_text_produces_one_line() {
    let (tree, engine) = laid_out(r#"<p id="p">some words here</p><p id="empty">   </p>"#);
    assert!((rect(&tree, &engine, "p").height - 19.2).abs() < 1e-9);
    assert_eq!(rect(&tree, &engine, "empty").height, 0.0);
}

#[test]
fn test_display_none_is_all_zero_and_takes_no_space() {
    let (tree, engine) = laid_out(
        r#"<div id="gone" style="display: none; height: 40px"><div id="inner" style="height: 5px"></div></div><div id="next" style="height: 1px"></div>"#,
    );
    assert_eq!(rect(&tree, &engine, "gone"), DomRect::default());
    assert_eq!(rect(&tree, &engine, "inner"), DomRect::default());
    assert_eq!(rect(&tree, &engine, "next").y, 8.0);
}

#[test]
fn test_auto_margins_center_fixed_width() {
    let (tree, engine) = laid_out(r#"<div id="box" style="width: 200px; margin: 0 auto"></div>"#);
    assert_eq!(rect(&tree, &engine, "box").x, 8.0 + (784.0 - 200.0) / 2.0);
}

#[test]
fn test_percentages_resolve_against_containing_block() {
    let (tree, engine) = laid_out(
        r#"<div id="outer" style="width: 400px; height: 200px"><div id="inner" style="width: 50%; height: 25%"></div></div>
           <div id="auto" style="height: 50%"></div>"#,
    );
    let inner = rect(&tree, &engine, "inner");
    assert_eq!((inner.width, inner.height), (200.0, 50.0));
    // body has an auto height, so a percentage height behaves as auto
    assert_eq!(rect(&tree, &engine, "auto").height, 0.0);
}

#[test]
fn test_relative_offsets_do_not_move_siblings() {
    let (tree, engine) = laid_out(
        r#"<div id="a" style="position: relative; top: 10px; left: 5px; height: 20px"></div><div id="b" style="height: 1px"></div>"#,
    );
    let a = rect(&tree, &engine, "a");
    assert_eq!((a.x, a.y), (13.0, 18.0));
    assert_eq!(rect(&tree, &engine, "b").y, 28.0);
}

#[test]
fn test_min_and_max_width() {
    let (tree, engine) = laid_out(
        r#"<div id="max" style="max-width: 300px"></div><div id="min" style="width: 10px; min-width: 40px"></div>"#,
    );
    assert_eq!(rect(&tree, &engine, "max").width, 300.0);
    assert_eq!(rect(&tree, &engine, "min").width, 40.0);
}

#[test]
fn test_flush_without_changes_does_nothing() {
    let (tree, mut engine) = laid_out("<div></div>");
    let before = engine.stats();
    assert!(!engine.flush(&tree));
    assert_eq!(engine.stats(), before);
}

#[test]
fn test_incremental_flush_reuses_clean_siblings() {
    let (mut tree, mut engine) = laid_out(
        r#"<div id="a" style="height: 50px"></div><div id="b" style="height: 30px"><p id="p" style="height: 10px"></p></div>"#,
    );
    assert!(engine.stats().full_layout);
    assert_eq!(engine.stats().boxes_laid_out, 5);

    let _ = set_style(&mut tree, &mut engine, "a", "height: 60px");
    assert!(engine.flush(&tree));

    let stats = engine.stats();
    assert!(!stats.full_layout);
    // html, body and the changed box
    assert_eq!(stats.boxes_laid_out, 3);
    // b and its child, translated down
    assert_eq!(stats.boxes_reused, 2);
    assert_eq!(rect(&tree, &engine, "b").y, 68.0);
    assert_eq!(rect(&tree, &engine, "p").y, 68.0);
}

#[test]
fn test_incremental_matches_from_scratch() {
    let (mut tree, mut engine) = laid_out(
        r#"<div id="a" style="width: 300px"><div id="a1" style="height: 12px; margin: 3px"></div></div>
           <div id="b" style="padding: 4px"><div id="b1" style="width: 50%; height: 7px"></div></div>
           <div id="c" style="position: relative; top: 2px; height: 9px"></div>"#,
    );
    let _ = set_style(&mut tree, &mut engine, "a", "width: 150px; padding-top: 11px");
    let _ = set_style(&mut tree, &mut engine, "b", "padding: 4px; width: 222px");
    assert!(engine.flush(&tree));

    let mut fresh = LayoutEngine::new(800.0, 600.0);
    assert!(fresh.flush(&tree));
    for id in ["a", "a1", "b", "b1", "c"] {
        assert_eq!(
            rect(&tree, &engine, id),
            rect(&tree, &fresh, id),
            "incremental and from-scratch layout disagree on #{id}"
        );
    }
}

#[test]
fn test_invalidate_all_forces_full_layout() {
    let (tree, mut engine) = laid_out(r#"<div id="a" style="height: 5px"></div>"#);
    engine.invalidate_all();
    assert!(engine.needs_layout());
    assert!(engine.flush(&tree));
    assert!(engine.stats().full_layout);
    assert_eq!(engine.stats().boxes_reused, 0);
}

#[test]
fn test_display_none_then_back() {
    let (mut tree, mut engine) =
        laid_out(r#"<div id="a" style="height: 5px"><div id="child" style="height: 5px"></div></div>"#);
    let _ = set_style(&mut tree, &mut engine, "a", "display: none");
    assert!(engine.flush(&tree));
    assert_eq!(rect(&tree, &engine, "child"), DomRect::default());

    let _ = set_style(&mut tree, &mut engine, "a", "height: 5px");
    assert!(engine.flush(&tree));
    assert_eq!(rect(&tree, &engine, "child").height, 5.0);
}

#[test]
fn test_resizing_viewport_relayouts_everything() {
    let (tree, mut engine) = laid_out(r#"<div id="a"></div>"#);
    engine.set_viewport(400.0, 300.0);
    assert!(engine.flush(&tree));
    assert_eq!(rect(&tree, &engine, "a").width, 384.0);
}
