use crate::lcom::metrics::{quantile, ClassRow, LcomTable, PRIMARY_METRIC};
use crate::utils::error::{AnalyzerError, Result};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

pub const METRICS_FILE: &str = "TypeMetrics.csv";
pub const TOP_CLASSES: usize = 10;
pub const CONCERN_QUANTILE: f64 = 0.9;

/// Metrics that get their own top-10 listing when present.
const RANKED_METRICS: [&str; 3] = ["LCOM1", "LCOM5", "YALCOM"];
const SECONDARY_METRIC: &str = "LCOM5";

#[derive(Debug, Clone)]
pub struct LcomAnalysis {
    /// Every class, highest LCOM1 first.
    pub sorted: Vec<ClassRow>,
    /// (metric, top classes as (name, value)).
    pub rankings: Vec<(String, Vec<(String, Option<f64>)>)>,
    pub lcom1_threshold: Option<f64>,
    pub lcom5_threshold: Option<f64>,
    pub concerning: Vec<ClassRow>,
}

/// Where the metrics CSV was found inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSource {
    pub dir: PathBuf,
    /// Every entry of the directory, sorted by name.
    pub files: Vec<String>,
    pub metrics_file: String,
    /// `TypeMetrics.csv` was absent and another CSV was picked.
    pub fallback: bool,
}

impl MetricsSource {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.metrics_file)
    }
}

/// `TypeMetrics.csv` when listed, otherwise the first CSV file by name.
pub fn locate_metrics_file(dir: &Path, mut files: Vec<String>) -> Result<MetricsSource> {
    files.sort();

    let (metrics_file, fallback) = if files.iter().any(|name| name == METRICS_FILE) {
        (METRICS_FILE.to_string(), false)
    } else {
        let first = files
            .iter()
            .find(|name| name.ends_with(".csv"))
            .cloned()
            .ok_or_else(|| AnalyzerError::ProcessingError {
                message: format!("No CSV files found in {}", dir.display()),
            })?;
        (first, true)
    };

    Ok(MetricsSource {
        dir: dir.to_path_buf(),
        files,
        metrics_file,
        fallback,
    })
}

pub fn analyze(table: &LcomTable) -> Result<LcomAnalysis> {
    table.require_metric(PRIMARY_METRIC)?;

    let sorted: Vec<ClassRow> = table
        .sorted_by(PRIMARY_METRIC, true)
        .into_iter()
        .cloned()
        .collect();

    let rankings = RANKED_METRICS
        .iter()
        .filter(|metric| table.has_metric(metric))
        .map(|metric| {
            let top = table
                .sorted_by(metric, true)
                .into_iter()
                .take(TOP_CLASSES)
                .map(|row| (row.class_name.clone(), table.metric(row, metric)))
                .collect();
            (metric.to_string(), top)
        })
        .collect();

    let lcom1_threshold = quantile(&table.metric_values(PRIMARY_METRIC), CONCERN_QUANTILE);
    let lcom5_threshold = quantile(&table.metric_values(SECONDARY_METRIC), CONCERN_QUANTILE);

    let above = |value: Option<f64>, threshold: Option<f64>| match (value, threshold) {
        (Some(v), Some(t)) => v > t,
        _ => false,
    };
    let concerning = table
        .rows
        .iter()
        .filter(|row| {
            above(table.metric(row, PRIMARY_METRIC), lcom1_threshold)
                || above(table.metric(row, SECONDARY_METRIC), lcom5_threshold)
        })
        .cloned()
        .collect();

    Ok(LcomAnalysis {
        sorted,
        rankings,
        lcom1_threshold,
        lcom5_threshold,
        concerning,
    })
}

pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.1}", v),
        Some(v) => format!("{:.4}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        None => "N/A".to_string(),
    }
}

/// Full console output of one LCOM report run.
pub struct LcomReport<'a> {
    pub source: &'a MetricsSource,
    pub table: &'a LcomTable,
    pub analysis: &'a LcomAnalysis,
}

impl fmt::Display for LcomReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_discovery(f, self.source)?;
        render(f, self.table, self.analysis)
    }
}

pub fn render_discovery<W: Write>(out: &mut W, source: &MetricsSource) -> fmt::Result {
    writeln!(out, "Looking for LCOM results in: {}", source.dir.display())?;
    writeln!(out, "Files in output directory:")?;
    for file in &source.files {
        writeln!(out, "- {}", file)?;
    }
    if source.fallback {
        writeln!(out, "Found CSV file: {}", source.path().display())?;
    }
    Ok(())
}

pub fn render<W: Write>(out: &mut W, table: &LcomTable, analysis: &LcomAnalysis) -> fmt::Result {
    writeln!(out, "==== LCOM Analysis Results ====")?;

    for (metric, top) in &analysis.rankings {
        writeln!(out, "\nTop {} classes with highest {} values:", TOP_CLASSES, metric)?;
        writeln!(out, "{:<60} {:>10}", "ClassName", metric)?;
        for (name, value) in top {
            writeln!(out, "{:<60} {:>10}", name, format_value(*value))?;
        }
    }

    writeln!(out, "\n==== Classes with High LCOM Values ====")?;
    writeln!(
        out,
        "Using LCOM1 threshold of {}",
        format_value(analysis.lcom1_threshold)
    )?;

    if analysis.concerning.is_empty() {
        return writeln!(out, "\nNo classes with critically high LCOM values found.");
    }

    writeln!(out, "\nClasses that may need functional decomposition:")?;
    write!(out, "{:<60}", "ClassName")?;
    for metric in &table.metric_names {
        write!(out, " {:>10}", metric)?;
    }
    writeln!(out)?;
    for row in &analysis.concerning {
        write!(out, "{:<60}", row.class_name)?;
        for value in &row.metrics {
            write!(out, " {:>10}", format_value(*value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
