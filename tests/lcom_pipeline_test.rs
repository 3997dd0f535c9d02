use dep_analyzer::core::Pipeline;
use dep_analyzer::lcom::analysis::{self, LcomReport};
use dep_analyzer::lcom::pipeline::RESULTS_FILE;
use dep_analyzer::lcom::table::TABLE_FILE;
use dep_analyzer::lcom::LcomTable;
use dep_analyzer::{AnalysisEngine, LcomReportPipeline, LcomTablePipeline, LocalStorage};
use tempfile::TempDir;

const TYPE_METRICS: &str = "\
Package Name,Type Name,LCOM1,LCOM2,LCOM5,YALCOM
com.acme,Order,3,1,0.2,0.1
com.acme,Invoice,12,8,0.9,0.7
com.acme,Customer,,2,0.4,0.3
com.acme,Ledger,7,5,0.6,0.5
";

fn write_metrics(dir: &TempDir, file: &str) -> std::path::PathBuf {
    let output_dir = dir.path().join("lcom_output");
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(output_dir.join(file), TYPE_METRICS).unwrap();
    output_dir
}

#[test]
fn test_report_writes_sorted_results() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = write_metrics(&temp_dir, "TypeMetrics.csv");

    let pipeline =
        LcomReportPipeline::new(LocalStorage::new(temp_dir.path()), &output_dir).without_charts();
    let location = AnalysisEngine::new(pipeline).run().unwrap();
    assert_eq!(location, RESULTS_FILE);

    let bytes = std::fs::read(temp_dir.path().join(RESULTS_FILE)).unwrap();
    let results = LcomTable::from_csv_bytes(&bytes).unwrap();
    let names: Vec<&str> = results.rows.iter().map(|r| r.class_name.as_str()).collect();
    // 缺值排在最後
    assert_eq!(
        names,
        vec![
            "com.acme.Invoice",
            "com.acme.Ledger",
            "com.acme.Order",
            "com.acme.Customer"
        ]
    );
    assert!(results.headers.iter().any(|h| h == "ClassName"));
}

#[test]
fn test_report_falls_back_to_first_csv() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = write_metrics(&temp_dir, "b_metrics.csv");
    std::fs::write(output_dir.join("notes.txt"), "ignored").unwrap();

    let pipeline =
        LcomReportPipeline::new(LocalStorage::new(temp_dir.path()), &output_dir).without_charts();
    let (source, table) = pipeline.extract().unwrap();
    assert_eq!(source.metrics_file, "b_metrics.csv");
    assert!(source.fallback);
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.metric_names, vec!["LCOM1", "LCOM2", "LCOM5", "YALCOM"]);
}

#[test]
fn test_report_lists_output_directory_before_results() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = write_metrics(&temp_dir, "b_metrics.csv");
    std::fs::write(output_dir.join("notes.txt"), "ignored").unwrap();

    let pipeline =
        LcomReportPipeline::new(LocalStorage::new(temp_dir.path()), &output_dir).without_charts();
    let (source, table) = pipeline.extract().unwrap();
    let analysis = analysis::analyze(&table).unwrap();
    let text = LcomReport {
        source: &source,
        table: &table,
        analysis: &analysis,
    }
    .to_string();

    let listing = "Files in output directory:\n- b_metrics.csv\n- notes.txt\n";
    assert!(text.contains(listing));
    let found = format!("Found CSV file: {}", output_dir.join("b_metrics.csv").display());
    assert!(text.contains(&found));
    assert!(text.find(listing).unwrap() < text.find("==== LCOM Analysis Results ====").unwrap());
}

#[test]
fn test_report_missing_directory_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = LcomReportPipeline::new(
        LocalStorage::new(temp_dir.path()),
        temp_dir.path().join("absent"),
    );
    let err = AnalysisEngine::new(pipeline).run().unwrap_err();
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_report_writes_charts() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = write_metrics(&temp_dir, "TypeMetrics.csv");

    let pipeline = LcomReportPipeline::new(LocalStorage::new(temp_dir.path()), &output_dir);
    AnalysisEngine::new(pipeline).run().unwrap();

    for file in ["lcom_heatmap.png", "lcom1_barchart.png"] {
        let png = std::fs::read(temp_dir.path().join(file)).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}

#[test]
fn test_table_from_results_and_sources() {
    let temp_dir = TempDir::new().unwrap();
    let src_root = temp_dir.path().join("src");
    let pkg = src_root.join("com/acme");
    std::fs::create_dir_all(&pkg).unwrap();
    std::fs::write(
        pkg.join("Invoice.java"),
        "package com.acme;\n\npublic class Invoice {\n    private int total;\n\n    public int getTotal() {\n        return total;\n    }\n}\n",
    )
    .unwrap();

    let results = "ClassName,LCOM1,LCOM5\ncom.acme.Invoice,12,0.9\ncom.acme.Order,3,0.2\n";
    std::fs::write(temp_dir.path().join(RESULTS_FILE), results).unwrap();

    let pipeline = LcomTablePipeline::new(
        LocalStorage::new(temp_dir.path()),
        RESULTS_FILE,
        &src_root,
    );
    let location = AnalysisEngine::new(pipeline).run().unwrap();
    assert_eq!(location, TABLE_FILE);

    let md = std::fs::read_to_string(temp_dir.path().join(TABLE_FILE)).unwrap();
    assert!(md.contains("| Java code | LCOM1 | LCOM5 |"));
    assert!(md.contains("<pre>public class Invoice {"));
    assert!(md.contains("// Class file not found"));
    assert!(md.contains("### Class with Highest LCOM: Invoice"));
    assert!(md.contains("### Class with Best Cohesion: Order"));
}

#[test]
fn test_table_with_missing_results_fails() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = LcomTablePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "missing.csv",
        temp_dir.path(),
    );
    assert!(AnalysisEngine::new(pipeline).run().is_err());
}
