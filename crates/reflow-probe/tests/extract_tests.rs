//! Style extraction over a bug-report directory.

use std::fs;
use std::path::Path;

use reflow_probe::extract::{
    REPORT_FILE_NAME, StyleCount, aggregate_reports, scan_reports, write_json,
};

fn report(root: &Path, folder: &str, body: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).expect("create folder");
    fs::write(dir.join(REPORT_FILE_NAME), body).expect("write report");
}

fn count(property: &str, value: &str, count: usize) -> StyleCount {
    StyleCount {
        property: property.to_string(),
        value: value.to_string(),
        count,
    }
}

fn sample_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    report(
        root.path(),
        "bug-1",
        r#"<script>
            box.style.width = "200px";
            box.style.width = "200px";
            box.style["display"] = "none";
        </script>"#,
    );
    report(
        root.path(),
        "bug-2",
        r#"<script>box.style.setProperty("display", "none"); box.style.width = '200px';</script>"#,
    );
    report(
        root.path(),
        "bug-3",
        r#"<script>el.style.width = "200px"; el.style["display"] = "none";</script>"#,
    );
    report(root.path(), "bug-4", "<p>no script</p>");
    fs::create_dir_all(root.path().join("empty")).expect("create folder");
    fs::write(root.path().join("stray.html"), "x.style.width = '1px'").expect("write");
    root
}

#[test]
fn test_scan_counts_per_folder_and_total() {
    let root = sample_root();
    let summary = scan_reports(root.path()).expect("scan");

    assert!(summary.root.is_absolute());
    assert_eq!(
        summary.totals_sorted,
        [count("width", "200px", 4), count("display", "none", 3)]
    );
    assert_eq!(
        summary.per_folder.keys().collect::<Vec<_>>(),
        ["bug-1", "bug-2", "bug-3", "bug-4"]
    );
    assert_eq!(
        summary.per_folder["bug-1"],
        [count("width", "200px", 2), count("display", "none", 1)]
    );
    assert!(summary.per_folder["bug-4"].is_empty());
}

#[test]
fn test_aggregate_counts_distinct_combinations() {
    let root = sample_root();
    let aggregate = aggregate_reports(root.path()).expect("aggregate");

    assert_eq!(aggregate.combined_counts.len(), 1);
    let combo = &aggregate.combined_counts[0];
    assert_eq!(combo.count, 3);
    assert_eq!(
        combo.pairs,
        [
            ("display".to_string(), "none".to_string()),
            ("width".to_string(), "200px".to_string()),
        ]
    );
}

#[test]
fn test_write_json_summary() {
    let root = sample_root();
    let out = root.path().join("style_counts.json");
    write_json(&out, &scan_reports(root.path()).expect("scan")).expect("write");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("json");
    assert_eq!(json["totals_sorted"][0]["property"], "width");
    assert_eq!(json["totals_sorted"][0]["count"], 4);
    assert_eq!(json["per_folder"]["bug-2"][1]["property"], "display");
}

#[test]
fn test_missing_root_is_an_error() {
    let root = tempfile::tempdir().expect("tempdir");
    assert!(scan_reports(root.path().join("missing")).is_err());
}
