//! Class cohesion metrics loaded from a CSV export (one row per class).

use crate::utils::error::{AnalyzerError, Result};
use std::cmp::Ordering;
use std::io::Read;

pub const CLASS_NAME_COLUMN: &str = "ClassName";
pub const PRIMARY_METRIC: &str = "LCOM1";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassRow {
    pub class_name: String,
    /// Raw CSV fields in header order.
    pub fields: Vec<String>,
    /// Parsed metric values, aligned with [`LcomTable::metric_names`].
    pub metrics: Vec<Option<f64>>,
}

impl ClassRow {
    /// Last dotted segment of the class name.
    pub fn simple_name(&self) -> &str {
        self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
    }
}

#[derive(Debug, Clone)]
pub struct LcomTable {
    pub headers: Vec<String>,
    pub metric_names: Vec<String>,
    pub rows: Vec<ClassRow>,
}

impl LcomTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(AnalyzerError::ProcessingError {
                message: "metrics CSV has no header row".to_string(),
            });
        }

        let name_source = ClassNameSource::detect(&headers);
        tracing::debug!("Class names resolved from {:?}", name_source);

        let metric_names: Vec<String> = headers
            .iter()
            .filter(|h| h.contains("LCOM"))
            .cloned()
            .collect();
        let metric_columns: Vec<usize> = metric_names
            .iter()
            .filter_map(|name| headers.iter().position(|h| h == name))
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            fields.resize(headers.len(), String::new());

            let metrics = metric_columns
                .iter()
                .map(|&col| parse_metric(&fields[col]))
                .collect();
            rows.push(ClassRow {
                class_name: name_source.class_name(&fields),
                fields,
                metrics,
            });
        }

        Ok(Self {
            headers,
            metric_names,
            rows,
        })
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metric_names.iter().position(|m| m == metric)
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.metric_index(metric).is_some()
    }

    pub fn metric(&self, row: &ClassRow, metric: &str) -> Option<f64> {
        self.metric_index(metric).and_then(|i| row.metrics[i])
    }

    /// Present values of a metric column, in row order.
    pub fn metric_values(&self, metric: &str) -> Vec<f64> {
        match self.metric_index(metric) {
            Some(i) => self.rows.iter().filter_map(|row| row.metrics[i]).collect(),
            None => Vec::new(),
        }
    }

    pub fn require_metric(&self, metric: &str) -> Result<usize> {
        self.metric_index(metric)
            .ok_or_else(|| AnalyzerError::ProcessingError {
                message: format!(
                    "metrics CSV has no '{}' column (columns: {})",
                    metric,
                    self.headers.join(", ")
                ),
            })
    }

    /// Rows ordered by `metric`; missing values always sort last. Stable.
    pub fn sorted_by(&self, metric: &str, descending: bool) -> Vec<&ClassRow> {
        let mut rows: Vec<&ClassRow> = self.rows.iter().collect();
        if let Some(i) = self.metric_index(metric) {
            rows.sort_by(|a, b| compare_metric(a.metrics[i], b.metrics[i], descending));
        }
        rows
    }

    /// Serialise `rows` with the original columns plus `ClassName`.
    pub fn to_csv(&self, rows: &[&ClassRow]) -> Result<Vec<u8>> {
        let existing = self.headers.iter().position(|h| h == CLASS_NAME_COLUMN);
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = self.headers.clone();
        if existing.is_none() {
            header.push(CLASS_NAME_COLUMN.to_string());
        }
        writer.write_record(&header)?;

        for row in rows {
            let mut fields = row.fields.clone();
            match existing {
                Some(col) => fields[col] = row.class_name.clone(),
                None => fields.push(row.class_name.clone()),
            }
            writer.write_record(&fields)?;
        }

        writer.into_inner().map_err(|e| AnalyzerError::IoError(e.into_error()))
    }
}

fn parse_metric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn compare_metric(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Where the readable class name of a row comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassNameSource {
    PackageAndType { package: usize, type_name: usize },
    Column(usize),
}

impl ClassNameSource {
    fn detect(headers: &[String]) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);

        if let (Some(package), Some(type_name)) = (find("Package Name"), find("Type Name")) {
            return ClassNameSource::PackageAndType { package, type_name };
        }
        if let Some(col) = find("Type Name").or_else(|| find(CLASS_NAME_COLUMN)) {
            return ClassNameSource::Column(col);
        }
        let guessed = headers.iter().position(|h| {
            let lower = h.to_lowercase();
            lower.contains("class") || lower.contains("type") || lower.contains("name")
        });
        ClassNameSource::Column(guessed.unwrap_or(0))
    }

    fn class_name(&self, fields: &[String]) -> String {
        match self {
            ClassNameSource::PackageAndType { package, type_name } => {
                format!("{}.{}", fields[*package], fields[*type_name])
            }
            ClassNameSource::Column(col) => fields[*col].clone(),
        }
    }
}
