use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dep_analyzer=debug,info")
        } else {
            EnvFilter::new("dep_analyzer=info")
        }
    })
}

/// 日誌一律寫到 stderr，stdout 保留給報告本身
pub fn init(verbose: bool, json: bool) {
    let output: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(output)
        .with(default_filter(verbose))
        .init();
}

pub fn init_cli_logger(verbose: bool) {
    init(verbose, false);
}
