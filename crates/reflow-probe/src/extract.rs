//! Style-assignment extraction from bug-report pages.
//!
//! A fuzzer's minified reproduction scripts mutate styles in one of three
//! ways:
//!
//! ```text
//! el.style["width"] = "200px"
//! el.style.width = "200px"
//! el.style.setProperty("width", "200px")
//! ```
//!
//! [`StyleExtractor`] pulls the `(property, value)` pairs out of such text,
//! and [`scan_reports`] / [`aggregate_reports`] tally them over a directory
//! of bug reports, each a folder holding a `minified_bug.html`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ProbeError;

/// Name of the reproduction file inside each bug-report folder.
pub const REPORT_FILE_NAME: &str = "minified_bug.html";

/// Default name of the per-folder summary, written inside the scanned root.
pub const SUMMARY_FILE_NAME: &str = "style_counts.json";

/// Default name of the combination summary.
pub const AGGREGATE_FILE_NAME: &str = "style_counts_aggregate.json";

const PATTERNS: [&str; 3] = [
    r#"\.style\[\s*["']([^"']+)["']\s*\]\s*=\s*["']([^"']+)["']"#,
    r#"\.style\.([a-zA-Z_]\w*)\s*=\s*["']([^"']+)["']"#,
    r#"setProperty\(\s*["']([^"']+)["']\s*,\s*["']([^"']+)["']"#,
];

/// One extracted style assignment.
pub type StylePair = (String, String);

/// Compiled extraction patterns.
#[derive(Debug, Clone)]
pub struct StyleExtractor {
    patterns: Vec<Regex>,
}

impl StyleExtractor {
    /// Compile the three assignment patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, ProbeError> {
        let patterns = PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Every style assignment in `text`.
    ///
    /// Matches are grouped by pattern: bracket assignments first, then
    /// dotted assignments, then `setProperty` calls. Quotes and surrounding
    /// whitespace are stripped and pairs with an empty property dropped.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<StylePair> {
        let mut pairs = Vec::new();
        for pattern in &self.patterns {
            for captures in pattern.captures_iter(text) {
                let property = normalize(&captures[1]);
                if property.is_empty() {
                    continue;
                }
                pairs.push((property, normalize(&captures[2])));
            }
        }
        pairs
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().replace(['"', '\''], "")
}

/// Occurrence counts that remember first-seen order, so equal counts keep
/// the order in which they were first encountered.
#[derive(Debug, Clone)]
struct Tally<K> {
    counts: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + std::hash::Hash> Tally<K> {
    fn new() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: K) {
        if let Some(&slot) = self.index.get(&key) {
            self.counts[slot].1 += 1;
        } else {
            let _ = self.index.insert(key.clone(), self.counts.len());
            self.counts.push((key, 1));
        }
    }

    fn most_common(mut self) -> Vec<(K, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
    }
}

/// How often one `(property, value)` pair occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleCount {
    /// CSS property as written in the script.
    pub property: String,
    /// Assigned value.
    pub value: String,
    /// Number of occurrences.
    pub count: usize,
}

/// Style assignment counts over a bug-report directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSummary {
    /// Absolute path of the scanned directory.
    pub root: PathBuf,
    /// Counts over all folders, most common first.
    pub totals_sorted: Vec<StyleCount>,
    /// Counts per folder, most common first.
    pub per_folder: BTreeMap<String, Vec<StyleCount>>,
}

/// How many reports share one exact set of distinct style assignments.
///
/// Serializes flat, as `{"count": n, "property_1": .., "value_1": .., ..}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCombination {
    /// Number of reports with this combination.
    pub count: usize,
    /// Distinct pairs, sorted.
    pub pairs: Vec<StylePair>,
}

impl Serialize for StyleCombination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + 2 * self.pairs.len()))?;
        map.serialize_entry("count", &self.count)?;
        for (i, (property, value)) in self.pairs.iter().enumerate() {
            map.serialize_entry(&format!("property_{}", i + 1), property)?;
            map.serialize_entry(&format!("value_{}", i + 1), value)?;
        }
        map.end()
    }
}

/// Combination counts over a bug-report directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleAggregate {
    /// Absolute path of the scanned directory.
    pub root: PathBuf,
    /// Combinations, most common first.
    pub combined_counts: Vec<StyleCombination>,
}

/// Read every `<root>/<folder>/minified_bug.html`, sorted by folder name.
///
/// Folders without a report are skipped, as are reports that cannot be
/// read. Invalid UTF-8 is replaced rather than rejected.
fn read_reports(root: &Path) -> Result<Vec<(String, String)>, ProbeError> {
    let mut reports = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path().join(REPORT_FILE_NAME);
        if !path.is_file() {
            continue;
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        let folder = entry.file_name().to_string_lossy().into_owned();
        reports.push((folder, String::from_utf8_lossy(&bytes).into_owned()));
    }
    reports.sort_by(|a, b| a.0.cmp(&b.0));
    log::debug!("found {} bug reports under {}", reports.len(), root.display());
    Ok(reports)
}

fn style_counts(tally: Tally<StylePair>) -> Vec<StyleCount> {
    tally
        .most_common()
        .into_iter()
        .map(|((property, value), count)| StyleCount {
            property,
            value,
            count,
        })
        .collect()
}

/// Count style assignments per folder and in total.
///
/// # Errors
///
/// Returns [`ProbeError::Io`] if `root` cannot be listed and
/// [`ProbeError::Pattern`] if the extractor cannot be built.
pub fn scan_reports(root: impl AsRef<Path>) -> Result<StyleSummary, ProbeError> {
    let root = root.as_ref();
    let extractor = StyleExtractor::new()?;
    let mut totals = Tally::new();
    let mut per_folder = BTreeMap::new();
    for (folder, text) in read_reports(root)? {
        let mut folder_tally = Tally::new();
        for pair in extractor.extract(&text) {
            totals.add(pair.clone());
            folder_tally.add(pair);
        }
        let _ = per_folder.insert(folder, style_counts(folder_tally));
    }
    Ok(StyleSummary {
        root: std::path::absolute(root)?,
        totals_sorted: style_counts(totals),
        per_folder,
    })
}

/// Count how many reports share each distinct set of style assignments.
///
/// Reports without any assignment are left out.
///
/// # Errors
///
/// Same as [`scan_reports`].
pub fn aggregate_reports(root: impl AsRef<Path>) -> Result<StyleAggregate, ProbeError> {
    let root = root.as_ref();
    let extractor = StyleExtractor::new()?;
    let mut combos = Tally::new();
    for (_, text) in read_reports(root)? {
        let mut pairs = extractor.extract(&text);
        pairs.sort();
        pairs.dedup();
        if !pairs.is_empty() {
            combos.add(pairs);
        }
    }
    Ok(StyleAggregate {
        root: std::path::absolute(root)?,
        combined_counts: combos
            .most_common()
            .into_iter()
            .map(|(pairs, count)| StyleCombination { count, pairs })
            .collect(),
    })
}

/// Write `value` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns [`ProbeError::Json`] or [`ProbeError::Io`].
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), ProbeError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{StyleCombination, StyleExtractor, Tally};

    fn pair(property: &str, value: &str) -> (String, String) {
        (property.to_string(), value.to_string())
    }

    #[test]
    fn extracts_all_three_forms_grouped_by_form() {
        let extractor = StyleExtractor::new().expect("patterns");
        let text = r#"
            a.style.setProperty("height", "10px");
            b.style.width = '200px';
            c.style["display"] = "none";
        "#;
        assert_eq!(
            extractor.extract(text),
            vec![
                pair("display", "none"),
                pair("width", "200px"),
                pair("height", "10px"),
            ]
        );
    }

    #[test]
    fn trims_whitespace_inside_quotes() {
        let extractor = StyleExtractor::new().expect("patterns");
        assert_eq!(
            extractor.extract(r#"x.style[" float "] = " left ""#),
            vec![pair("float", "left")]
        );
    }

    #[test]
    fn ignores_reads_and_non_literal_values() {
        let extractor = StyleExtractor::new().expect("patterns");
        assert!(extractor.extract("let w = x.style.width; x.style.width = w;").is_empty());
    }

    #[test]
    fn tally_orders_by_count_then_first_seen() {
        let mut tally = Tally::new();
        for key in ["b", "a", "c", "a", "c"] {
            tally.add(key);
        }
        assert_eq!(tally.most_common(), vec![("a", 2), ("c", 2), ("b", 1)]);
    }

    #[test]
    fn combination_serializes_flat() {
        let combo = StyleCombination {
            count: 3,
            pairs: vec![pair("display", "none"), pair("width", "1px")],
        };
        let json = serde_json::to_string(&combo).expect("json");
        assert_eq!(
            json,
            r#"{"count":3,"property_1":"display","value_1":"none","property_2":"width","value_2":"1px"}"#
        );
    }
}
