pub mod toml_config;

use crate::core::visualize::DEFAULT_IMAGE_PATH;
use crate::core::{ConfigProvider, PlotOptions};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, validate_range, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dep-analyzer")]
#[command(about = "Analyze a module import map: coupling, cycles, depth and impact")]
pub struct CliConfig {
    /// JSON file mapping module names to {"imports": [...]}
    pub input: String,

    #[arg(long, help = "Optional TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Where to write the dependency graph PNG")]
    pub image: Option<String>,

    #[arg(long, help = "Skip the graph visualization")]
    pub no_plot: bool,

    #[arg(long, help = "Seed for depth sampling and graph layout")]
    pub seed: Option<u64>,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併 TOML 檔案與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<AnalyzerSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        let mut settings = AnalyzerSettings::from_toml(self.input.clone(), &file);
        if let Some(image) = &self.image {
            settings.image_path = image.clone();
        }
        if self.no_plot {
            settings.plot = false;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings.monitor |= self.monitor;
        Ok(settings)
    }
}

/// Fully resolved settings for one analyzer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    pub input_path: String,
    pub image_path: String,
    pub plot: bool,
    pub plot_options: PlotOptions,
    pub seed: Option<u64>,
    pub monitor: bool,
}

impl AnalyzerSettings {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            image_path: DEFAULT_IMAGE_PATH.to_string(),
            plot: true,
            plot_options: PlotOptions::default(),
            seed: None,
            monitor: false,
        }
    }

    pub fn from_toml(input_path: impl Into<String>, file: &TomlConfig) -> Self {
        let mut settings = Self::new(input_path);
        if let Some(image) = file.image_path() {
            settings.image_path = image.to_string();
        }
        if let Some(plot) = file.plot_enabled() {
            settings.plot = plot;
        }
        if let Some(plot) = &file.plot {
            let defaults = settings.plot_options;
            settings.plot_options = PlotOptions {
                width: plot.width.unwrap_or(defaults.width),
                height: plot.height.unwrap_or(defaults.height),
                iterations: plot.iterations.unwrap_or(defaults.iterations),
            };
        }
        settings.seed = file.seed();
        settings.monitor = file.monitoring_enabled();
        settings
    }
}

impl Validate for AnalyzerSettings {
    fn validate(&self) -> Result<()> {
        if self.input_path.trim().is_empty() {
            return Err(AnalyzerError::MissingConfigError {
                field: "input".to_string(),
            });
        }
        validate_path("input", &self.input_path)?;

        // 停用繪圖時不檢查圖片設定
        if !self.plot {
            return Ok(());
        }
        validate_path("image_path", &self.image_path)?;
        validate_file_extension("image_path", &self.image_path, &["png"])?;
        validate_range("plot.width", self.plot_options.width, 200, 8000)?;
        validate_range("plot.height", self.plot_options.height, 200, 8000)?;
        validate_range("plot.iterations", self.plot_options.iterations, 1, 500)?;
        Ok(())
    }
}

impl ConfigProvider for AnalyzerSettings {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn image_path(&self) -> &str {
        &self.image_path
    }

    fn plot_enabled(&self) -> bool {
        self.plot
    }

    fn plot_options(&self) -> PlotOptions {
        self.plot_options
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalyzerSettings::new("deps.json");
        assert_eq!(settings.image_path(), "dependency_graph_analysis.png");
        assert!(settings.plot_enabled());
        assert_eq!(settings.plot_options(), PlotOptions::default());
        assert_eq!(settings.seed(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_values_apply() {
        let file = TomlConfig::from_toml_str(
            "[output]\nimage_path = \"g.png\"\n[plot]\nwidth = 640\n[depth]\nseed = 3\n",
        )
        .unwrap();
        let settings = AnalyzerSettings::from_toml("deps.json", &file);
        assert_eq!(settings.image_path, "g.png");
        assert_eq!(settings.plot_options.width, 640);
        assert_eq!(settings.plot_options.height, 1200);
        assert_eq!(settings.seed, Some(3));
    }

    #[test]
    fn test_validation_rejects_bad_image_settings() {
        let mut settings = AnalyzerSettings::new("deps.json");
        settings.image_path = "graph.jpg".to_string();
        assert!(matches!(
            settings.validate(),
            Err(AnalyzerError::InvalidConfigValueError { .. })
        ));

        settings.image_path = "graph.png".to_string();
        settings.plot_options.iterations = 0;
        assert!(settings.validate().is_err());

        // 不繪圖時忽略圖片設定
        settings.plot = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let mut settings = AnalyzerSettings::new("");
        settings.plot = false;
        assert!(matches!(
            settings.validate(),
            Err(AnalyzerError::MissingConfigError { .. })
        ));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[output]\nimage_path = \"file.png\"\nplot = true\n[depth]\nseed = 1\n")
            .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = CliConfig::parse_from([
            "dep-analyzer",
            "deps.json",
            "--config",
            path.as_str(),
            "--image",
            "cli.png",
            "--seed",
            "9",
            "--no-plot",
        ]);
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.input_path, "deps.json");
        assert_eq!(settings.image_path, "cli.png");
        assert_eq!(settings.seed, Some(9));
        assert!(!settings.plot);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_missing_input_argument_is_rejected() {
        assert!(CliConfig::try_parse_from(["dep-analyzer"]).is_err());
    }
}
