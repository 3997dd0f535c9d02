use crate::domain::model::PlotOptions;
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// Entry names directly under `path`, sorted.
    fn list_dir(&self, path: &str) -> Result<Vec<String>>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn image_path(&self) -> &str;
    fn plot_enabled(&self) -> bool;
    fn plot_options(&self) -> PlotOptions;
    /// `None` means the depth sampler and layout are seeded from entropy.
    fn seed(&self) -> Option<u64>;
}

/// Three-phase batch job driven by `AnalysisEngine`.
pub trait Pipeline {
    type Extracted;
    type Transformed;

    fn extract(&self) -> Result<Self::Extracted>;
    fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    /// Emits the results and returns a short description of where they went.
    fn load(&self, result: Self::Transformed) -> Result<String>;
}
