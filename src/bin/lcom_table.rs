use clap::Parser;
use dep_analyzer::utils::error::ErrorCategory;
use dep_analyzer::utils::logger;
use dep_analyzer::{AnalysisEngine, LcomTablePipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "lcom-table")]
#[command(about = "Write a markdown table of representative classes and their LCOM values")]
struct Args {
    /// CSV produced by lcom-report
    results_file: String,

    /// Root directory of the Java sources
    src_root: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    logger::init_cli_logger(args.verbose);

    let pipeline = LcomTablePipeline::new(
        LocalStorage::current_dir(),
        args.results_file.clone(),
        &args.src_root,
    );
    // 只有讀檔或解析失敗才提示檢查 CSV
    AnalysisEngine::new(pipeline).run().map_err(|e| {
        let context = match e.category() {
            ErrorCategory::Input => format!(
                "Could not read {}. Make sure it exists and is a valid CSV",
                args.results_file
            ),
            _ => format!("Could not build the LCOM table from {}", args.results_file),
        };
        anyhow::Error::new(e).context(context)
    })?;
    Ok(())
}
