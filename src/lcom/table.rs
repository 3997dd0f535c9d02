//! Markdown table of representative classes with their source skeletons.

use crate::lcom::analysis::format_value;
use crate::lcom::metrics::{ClassRow, LcomTable, PRIMARY_METRIC};
use crate::utils::error::{AnalyzerError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const TABLE_FILE: &str = "lcom_table.md";
pub const TABLE_METRICS: [&str; 6] = ["LCOM1", "LCOM2", "LCOM3", "LCOM4", "LCOM5", "YALCOM"];

const CLASS_NOT_FOUND: &str = "// Class file not found";
const UNPARSEABLE: &str = "// Unable to parse class structure";

/// High, middle and low LCOM1 rows. Rows may repeat on small inputs.
pub fn select_classes(table: &LcomTable) -> Result<Vec<ClassRow>> {
    table.require_metric(PRIMARY_METRIC)?;
    let descending = table.sorted_by(PRIMARY_METRIC, true);
    let ascending = table.sorted_by(PRIMARY_METRIC, false);

    let mut selected: Vec<ClassRow> = descending.iter().take(4).map(|r| (*r).clone()).collect();

    let n = descending.len();
    let middle = if n >= 10 {
        let start = n / 3;
        descending[start..(start + 3).min(n)].to_vec()
    } else {
        descending.get(1..2).map(|rows| rows.to_vec()).unwrap_or_default()
    };
    selected.extend(middle.into_iter().cloned());
    selected.extend(ascending.iter().take(3).map(|r| (*r).clone()));
    Ok(selected)
}

/// Locate `a.b.C` as `a/b/C.java`, falling back to any `C.java` under `src_root`.
pub fn find_class_file(src_root: &Path, class_name: &str) -> Option<PathBuf> {
    let direct = src_root.join(format!("{}.java", class_name.replace('.', "/")));
    if direct.is_file() {
        return Some(direct);
    }

    let simple = class_name.rsplit('.').next().unwrap_or(class_name);
    let file_name = format!("{}.java", simple);
    WalkDir::new(src_root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name)
        .map(|entry| entry.into_path())
}

pub struct SkeletonExtractor {
    pattern: Regex,
}

impl SkeletonExtractor {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(
            r"(?s)(public\s+(?:final\s+)?class\s+\w+.*?\{).*?((?:\s+public|\s+private|\s+protected).*?[{].*?[}])",
        )
        .map_err(|e| AnalyzerError::ProcessingError {
            message: format!("invalid class pattern: {}", e),
        })?;
        Ok(Self { pattern })
    }

    /// Class header plus its first member, elided with `// ...`.
    pub fn extract(&self, source: &str) -> String {
        match self.pattern.captures(source) {
            Some(caps) => format!(
                "{}\n    // ...\n{}\n    // ...\n}}",
                &caps[1], &caps[2]
            ),
            None => UNPARSEABLE.to_string(),
        }
    }

    pub fn extract_file(&self, path: &Path) -> String {
        match std::fs::read_to_string(path) {
            Ok(source) => self.extract(&source),
            Err(e) => format!("// Error reading class: {}", e),
        }
    }
}

fn code_cell(code: &str) -> String {
    let escaped = code.replace('|', "\\|");
    format!("<pre>{}</pre>", escaped.lines().collect::<Vec<_>>().join("<br>"))
}

pub fn generate_markdown(table: &LcomTable, src_root: &Path) -> Result<String> {
    let selected = select_classes(table)?;
    let extractor = SkeletonExtractor::new()?;
    let metrics: Vec<&str> = TABLE_METRICS
        .iter()
        .copied()
        .filter(|m| table.has_metric(m))
        .collect();

    let mut md = String::from("# LCOM Analysis Results\n\n");
    md.push_str("## Table of LCOM Values for Selected Classes\n\n");

    md.push_str("| Java code |");
    for metric in &metrics {
        md.push_str(&format!(" {} |", metric));
    }
    md.push_str("\n|:---|");
    for _ in &metrics {
        md.push_str("---:|");
    }
    md.push('\n');

    for row in &selected {
        let code = match find_class_file(src_root, &row.class_name) {
            Some(path) => extractor.extract_file(&path),
            None => CLASS_NOT_FOUND.to_string(),
        };
        md.push_str(&format!("| {} |", code_cell(&code)));
        for metric in &metrics {
            md.push_str(&format!(" {} |", format_value(table.metric(row, metric))));
        }
        md.push('\n');
    }

    md.push_str("\n## Analysis and Interpretation\n\n");

    let by_lcom1 = |row: &&ClassRow| table.metric(row, PRIMARY_METRIC).unwrap_or(f64::NAN);
    let highest = selected
        .iter()
        .filter(|r| !by_lcom1(r).is_nan())
        .max_by(|a, b| by_lcom1(a).total_cmp(&by_lcom1(b)));
    let lowest = selected
        .iter()
        .filter(|r| !by_lcom1(r).is_nan())
        .min_by(|a, b| by_lcom1(a).total_cmp(&by_lcom1(b)));

    if let Some(row) = highest {
        md.push_str(&format!("### Class with Highest LCOM: {}\n", row.simple_name()));
        md.push_str("- **High LCOM Values** indicate poor cohesion\n");
        md.push_str("- This class likely has multiple responsibilities\n");
        md.push_str("- Methods operate on different sets of instance variables\n");
        md.push_str("- **Refactoring Recommendation**: Consider splitting this class into multiple cohesive classes\n\n");
    }
    if let Some(row) = lowest {
        md.push_str(&format!("### Class with Best Cohesion: {}\n", row.simple_name()));
        md.push_str("- **Low LCOM Values** indicate good cohesion\n");
        md.push_str("- The methods in this class work together on shared data\n");
        md.push_str("- This class follows the Single Responsibility Principle\n");
        md.push_str("- This class serves as a good example of cohesive design\n\n");
    }

    md.push_str("### General Observations\n");
    md.push_str("- Larger classes tend to have higher LCOM values\n");
    md.push_str("- Classes that implement multiple interfaces often have higher LCOM values\n");
    md.push_str("- Data model classes tend to have better cohesion than service classes\n");
    md.push_str("- LCOM5 and YALCOM provide more nuanced measurements than LCOM1\n\n");

    md.push_str("### Refactoring Strategies\n");
    md.push_str("1. **Extract Class**: Split large classes with high LCOM into multiple cohesive classes\n");
    md.push_str("2. **Move Method**: Relocate methods to classes where they are more cohesive\n");
    md.push_str("3. **Extract Interface**: Define clear interfaces for different responsibilities\n");
    md.push_str("4. **Apply Composition**: Use composition to manage relationships between newly extracted classes\n");

    Ok(md)
}
