//! Properties of the geometry reporter.

mod common;

use common::MockHost;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use reflow_page::Page;
use reflow_probe::{GeometryField, LayoutHost, report_geometry};

const PAGE: &str = r#"<html><body>
<div id="a" style="width: 50%; padding: 4px"></div>
<div id="b" style="height: 30px; margin-left: 12px">text</div>
</body></html>"#;

fn fields_from(picks: &[u8]) -> Vec<GeometryField> {
    let all = GeometryField::all();
    picks
        .iter()
        .map(|&pick| all[usize::from(pick) % all.len()])
        .collect()
}

#[quickcheck]
fn report_keeps_requested_order(picks: Vec<u8>, width: u16, height: u16) -> bool {
    let fields = fields_from(&picks);
    let mut host = MockHost::new(&[
        ("top", 10.0, 10.0),
        ("box", f64::from(width), f64::from(height)),
    ]);
    let element = host.get_element_by_id("box").expect("#box");
    let rect = host.bounding_client_rect(element).expect("rect");
    let snapshot = report_geometry(&mut host, element, &fields).expect("report");

    snapshot.element == "box"
        && snapshot.fields().eq(fields.iter().copied())
        && snapshot
            .values
            .iter()
            .all(|v| v.value == v.field.read(&rect))
}

#[quickcheck]
fn page_report_matches_rect(picks: Vec<u8>) -> bool {
    let fields = fields_from(&picks);
    let mut page = Page::from_html(PAGE);
    let element = page.get_element_by_id("b").expect("#b");
    let rect = page.bounding_client_rect(element).expect("rect");
    let snapshot = report_geometry(&mut page, element, &fields).expect("report");
    snapshot.fields().eq(fields.iter().copied())
        && snapshot.values.iter().all(|v| v.value == v.field.read(&rect))
}

#[quickcheck]
fn repeated_reports_are_identical(picks: Vec<u8>, repeats: u8) -> TestResult {
    if repeats == 0 {
        return TestResult::discard();
    }
    let fields = fields_from(&picks);
    let mut page = Page::from_html(PAGE);
    let markup = LayoutHost::document_markup(&page).expect("markup");
    let element = page.get_element_by_id("a").expect("#a");
    let first = report_geometry(&mut page, element, &fields).expect("report");
    for _ in 0..repeats % 8 {
        let again = report_geometry(&mut page, element, &fields).expect("report");
        if again != first {
            return TestResult::failed();
        }
    }
    let unchanged = LayoutHost::document_markup(&page).expect("markup") == markup;
    TestResult::from_bool(unchanged)
}

#[quickcheck]
fn reads_do_not_disturb_layout(picks: Vec<u8>) -> bool {
    let fields = fields_from(&picks);
    let mut page = Page::from_html(PAGE);
    let b = page.get_element_by_id("b").expect("#b");
    let before = page.bounding_client_rect(b).expect("rect");
    let stats = page.layout_stats();
    let a = page.get_element_by_id("a").expect("#a");
    let _ = report_geometry(&mut page, a, &fields).expect("report");
    page.bounding_client_rect(b).expect("rect") == before && page.layout_stats() == stats
}
