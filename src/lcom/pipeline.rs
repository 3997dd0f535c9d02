use crate::core::{Pipeline, Storage};
use crate::lcom::analysis::{self, LcomAnalysis, LcomReport, MetricsSource};
use crate::lcom::charts::{self, BARCHART_FILE, HEATMAP_FILE};
use crate::lcom::metrics::{ClassRow, LcomTable};
use crate::lcom::table::{self, TABLE_FILE};
use crate::utils::error::{AnalyzerError, Result};
use std::path::PathBuf;

pub const RESULTS_FILE: &str = "lcom_results.csv";

pub struct LcomReportPipeline<S: Storage> {
    storage: S,
    output_dir: PathBuf,
    charts: bool,
}

impl<S: Storage> LcomReportPipeline<S> {
    pub fn new(storage: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            output_dir: output_dir.into(),
            charts: true,
        }
    }

    pub fn without_charts(mut self) -> Self {
        self.charts = false;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write_charts(&self, table: &LcomTable, top: &[ClassRow]) {
        println!("\nGenerating visualizations...");
        let outputs = [
            (HEATMAP_FILE, "LCOM metrics heatmap", charts::heatmap(table, top)),
            (BARCHART_FILE, "LCOM1 bar chart", charts::bar_chart(table, top)),
        ];
        for (file, label, rendered) in outputs {
            match rendered.and_then(|png| self.storage.write_file(file, &png)) {
                Ok(()) => println!("Saved {} to {}", label, file),
                Err(e) => {
                    tracing::warn!("⚠️ Chart {} failed: {}", file, e);
                    println!("Warning: Error creating visualizations: {}", e);
                }
            }
        }
    }
}

impl<S: Storage> Pipeline for LcomReportPipeline<S> {
    type Extracted = (MetricsSource, LcomTable);
    type Transformed = (MetricsSource, LcomTable, LcomAnalysis);

    fn extract(&self) -> Result<(MetricsSource, LcomTable)> {
        let dir = self.output_dir.to_string_lossy();
        tracing::debug!("🔍 Looking for LCOM results in: {}", dir);
        let files = self
            .storage
            .list_dir(&dir)
            .map_err(|e| AnalyzerError::InvalidConfigValueError {
                field: "output_dir".to_string(),
                value: dir.to_string(),
                reason: format!("Output directory cannot be read: {}", e),
            })?;

        let source = analysis::locate_metrics_file(&self.output_dir, files)?;
        let bytes = self.storage.read_file(&source.path().to_string_lossy())?;
        let table = LcomTable::from_csv_bytes(&bytes)?;
        tracing::info!(
            "📥 Loaded LCOM data with {} classes (columns: {})",
            table.rows.len(),
            table.headers.join(", ")
        );
        Ok((source, table))
    }

    fn transform(
        &self,
        (source, table): (MetricsSource, LcomTable),
    ) -> Result<(MetricsSource, LcomTable, LcomAnalysis)> {
        let analysis = analysis::analyze(&table)?;
        Ok((source, table, analysis))
    }

    fn load(
        &self,
        (source, table, analysis): (MetricsSource, LcomTable, LcomAnalysis),
    ) -> Result<String> {
        let report = LcomReport {
            source: &source,
            table: &table,
            analysis: &analysis,
        };
        print!("{}", report);

        if self.charts {
            self.write_charts(&table, &analysis.sorted);
        }

        let sorted: Vec<&ClassRow> = analysis.sorted.iter().collect();
        self.storage.write_file(RESULTS_FILE, &table.to_csv(&sorted)?)?;
        println!("Saved LCOM results to {}", RESULTS_FILE);
        Ok(RESULTS_FILE.to_string())
    }
}

pub struct LcomTablePipeline<S: Storage> {
    storage: S,
    results_file: String,
    src_root: PathBuf,
}

impl<S: Storage> LcomTablePipeline<S> {
    pub fn new(storage: S, results_file: impl Into<String>, src_root: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            results_file: results_file.into(),
            src_root: src_root.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage> Pipeline for LcomTablePipeline<S> {
    type Extracted = LcomTable;
    type Transformed = String;

    fn extract(&self) -> Result<LcomTable> {
        let bytes = self.storage.read_file(&self.results_file)?;
        LcomTable::from_csv_bytes(&bytes)
    }

    fn transform(&self, table: LcomTable) -> Result<String> {
        table::generate_markdown(&table, &self.src_root)
    }

    fn load(&self, markdown: String) -> Result<String> {
        self.storage.write_file(TABLE_FILE, markdown.as_bytes())?;
        println!("LCOM table has been written to {}", TABLE_FILE);
        Ok(TABLE_FILE.to_string())
    }
}
