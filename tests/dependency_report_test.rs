use dep_analyzer::core::report;
use dep_analyzer::core::{Pipeline, StageOutcome};
use dep_analyzer::{AnalysisEngine, AnalyzerError, AnalyzerSettings, DependencyPipeline, LocalStorage};
use tempfile::TempDir;

fn settings(plot: bool) -> AnalyzerSettings {
    let mut settings = AnalyzerSettings::new("deps.json");
    settings.plot = plot;
    settings.seed = Some(7);
    settings.image_path = "out/graph.png".to_string();
    settings.plot_options.width = 300;
    settings.plot_options.height = 300;
    settings.plot_options.iterations = 10;
    settings
}

fn write_input(dir: &TempDir, json: &str) {
    std::fs::write(dir.path().join("deps.json"), json).unwrap();
}

#[test]
fn test_end_to_end_with_image() {
    let temp_dir = TempDir::new().unwrap();
    write_input(
        &temp_dir,
        r#"{
            "app": {"imports": ["core", "util", "db"]},
            "api": {"imports": ["core", "util"]},
            "cli": {"imports": ["core"]},
            "jobs": {"imports": ["core", "db"]},
            "core": {"imports": ["util"]},
            "util": {},
            "db": {"imports": []}
        }"#,
    );

    let pipeline = DependencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        settings(true),
    );
    let engine = AnalysisEngine::new_with_monitoring(pipeline, false);
    let location = engine.run().unwrap();

    assert_eq!(location, "out/graph.png");
    let png = std::fs::read(temp_dir.path().join("out/graph.png")).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_core_module_report() {
    let temp_dir = TempDir::new().unwrap();
    write_input(
        &temp_dir,
        r#"{
            "a": {"imports": ["core"]},
            "b": {"imports": ["core"]},
            "c": {"imports": ["core"]},
            "d": {"imports": ["core"]},
            "e": {"imports": ["core"]},
            "core": {}
        }"#,
    );

    let pipeline = DependencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        settings(false),
    );
    let graph = pipeline.extract().unwrap();
    let result = pipeline.transform(graph).unwrap();

    let core = &result.report.impact.core_modules;
    assert_eq!(core.len(), 1);
    assert_eq!(core[0].name, "core");
    assert_eq!(core[0].fan_in, 5);

    let text = report::render(&result.report);
    assert!(text.contains("- core: 5 dependent modules"));
    assert!(text.contains("  Impact if modified: Would affect 5 dependent modules:"));
    assert!(text.contains("  - a\n  - b\n  - c\n  - ... and 2 more"));
    assert!(text.contains("Maximum dependency chain length: 1"));
    assert!(text.contains("- a: 1 levels deep"));
    assert!(!text.contains("more entry points"));
}

#[test]
fn test_more_than_ten_cycles_are_truncated() {
    // 12 個互相引用的模組對，每對形成一個循環
    let mut modules = Vec::new();
    for i in 0..12 {
        modules.push(format!(r#""x{i}": {{"imports": ["y{i}"]}}"#));
        modules.push(format!(r#""y{i}": {{"imports": ["x{i}"]}}"#));
    }
    let temp_dir = TempDir::new().unwrap();
    write_input(&temp_dir, &format!("{{{}}}", modules.join(",")));

    let pipeline = DependencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        settings(false),
    );
    let graph = pipeline.extract().unwrap();
    let result = pipeline.transform(graph).unwrap();

    match &result.report.cycles {
        StageOutcome::Completed(cycles) => assert_eq!(cycles.len(), 12),
        StageOutcome::Degraded(e) => panic!("cycle detection degraded: {}", e),
    }
    let text = report::render(&result.report);
    assert!(text.contains("Found 12 cyclic dependencies:"));
    assert!(text.contains("Cycle 10:"));
    assert!(!text.contains("Cycle 11:"));
    assert!(text.contains("... and 2 more cycles"));
}

#[test]
fn test_malformed_json_is_fatal_with_preview() {
    let temp_dir = TempDir::new().unwrap();
    let garbage = format!("{{\"a\": {{\"imports\": [{}", "\"x\", ".repeat(200));
    write_input(&temp_dir, &garbage);

    let pipeline = DependencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        settings(true),
    );
    let err = AnalysisEngine::new(pipeline).run().unwrap_err();

    assert!(matches!(err, AnalyzerError::JsonDecodeError { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Error decoding JSON:"));
    let preview = err.input_preview().unwrap();
    assert_eq!(preview.chars().count(), 500);
    assert!(garbage.starts_with(preview));
    assert!(!temp_dir.path().join("out/graph.png").exists());
}

#[test]
fn test_non_object_document_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_input(&temp_dir, r#"["a", "b"]"#);

    let pipeline = DependencyPipeline::new(
        LocalStorage::new(temp_dir.path()),
        settings(false),
    );
    let err = pipeline.extract().err().unwrap();
    assert!(matches!(err, AnalyzerError::InvalidInputError { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_same_seed_gives_same_report() {
    let temp_dir = TempDir::new().unwrap();
    let mut modules = Vec::new();
    for i in 0..30 {
        let next: Vec<String> = (i + 1..(i + 3).min(30))
            .map(|j| format!("\"m{}\"", j))
            .collect();
        modules.push(format!(r#""m{}": {{"imports": [{}]}}"#, i, next.join(",")));
    }
    write_input(&temp_dir, &format!("{{{}}}", modules.join(",")));

    let run = || {
        let pipeline = DependencyPipeline::new(
            LocalStorage::new(temp_dir.path()),
            settings(false),
        );
        let graph = pipeline.extract().unwrap();
        pipeline.transform(graph).unwrap().report
    };
    assert_eq!(run(), run());
}
