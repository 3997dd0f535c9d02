//! Class cohesion (LCOM) reporting over metrics CSV exports.

pub mod analysis;
pub mod charts;
pub mod metrics;
pub mod pipeline;
pub mod table;

pub use metrics::{ClassRow, LcomTable};
pub use pipeline::{LcomReportPipeline, LcomTablePipeline};
