use clap::Parser;
use dep_analyzer::utils::{logger, validation::Validate};
use dep_analyzer::{AnalysisEngine, AnalyzerError, CliConfig, DependencyPipeline, LocalStorage};

fn report_failure(e: &AnalyzerError) -> ! {
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    // JSON 解析失敗時在 stdout 顯示輸入預覽
    if let Some(preview) = e.input_preview() {
        println!("{}", e);
        println!("The file might not be valid JSON. Here are the first few lines:");
        println!("{}", preview);
    } else {
        eprintln!("❌ {}", e.user_friendly_message());
    }
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code().max(1));
}

fn main() {
    // 缺少參數時顯示用法並以 1 結束
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // 初始化日誌
    logger::init(config.verbose, config.log_json);

    tracing::info!("Starting dep-analyzer");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => report_failure(&e),
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report_failure(&e);
    }

    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }
    let monitor_enabled = settings.monitor;

    let pipeline = DependencyPipeline::new(LocalStorage::current_dir(), settings);
    let engine = AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(location) => {
            tracing::info!("📁 Output: {}", location);
        }
        Err(e) => report_failure(&e),
    }
}
