use anyhow::Context;
use clap::Parser;
use dep_analyzer::utils::logger;
use dep_analyzer::{AnalysisEngine, LcomReportPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "lcom-report")]
#[command(about = "Summarize LCOM cohesion metrics exported as CSV")]
struct Args {
    /// Directory holding the metrics CSV export
    #[arg(default_value = "lcom_output")]
    output_dir: String,

    /// Skip the heatmap and bar chart
    #[arg(long)]
    no_charts: bool,

    /// Enable system monitoring
    #[arg(long)]
    monitor: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Starting LCOM report for {}", args.output_dir);

    let mut pipeline = LcomReportPipeline::new(LocalStorage::current_dir(), &args.output_dir);
    if args.no_charts {
        pipeline = pipeline.without_charts();
    }

    let engine = AnalysisEngine::new_with_monitoring(pipeline, args.monitor);
    let location = engine
        .run()
        .with_context(|| format!("LCOM analysis of '{}' failed", args.output_dir))?;

    println!("\nLCOM analysis complete. Results saved to {}", location);
    Ok(())
}
