pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod lcom;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, AnalyzerSettings};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{engine::AnalysisEngine, graph::DependencyGraph, pipeline::DependencyPipeline};
pub use lcom::{LcomReportPipeline, LcomTablePipeline};
pub use utils::error::{AnalyzerError, Result};
