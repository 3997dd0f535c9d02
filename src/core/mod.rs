pub mod coupling;
pub mod cycles;
pub mod depth;
pub mod engine;
pub mod graph;
pub mod impact;
pub mod isolation;
pub mod pipeline;
pub mod report;
pub mod visualize;

pub use crate::domain::model::{
    CouplingReport, Cycle, DependencyReport, DepthReport, ImpactReport, PlotOptions, StageOutcome,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
