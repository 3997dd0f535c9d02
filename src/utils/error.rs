use thiserror::Error;

/// 輸入內容預覽的最大字元數
pub const PREVIEW_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error decoding JSON: {source}")]
    JsonDecodeError {
        #[source]
        source: serde_json::Error,
        preview: String,
    },

    #[error("Invalid dependency document: {message}")]
    InvalidInputError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cycle detection failed: {message}")]
    CycleDetectionError { message: String },

    #[error("Path enumeration failed: {message}")]
    PathEnumerationError { message: String },

    #[error("Image rendering failed: {0}")]
    RenderError(#[from] image::ImageError),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Analysis,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::IoError(_)
            | AnalyzerError::JsonDecodeError { .. }
            | AnalyzerError::InvalidInputError { .. }
            | AnalyzerError::CsvError(_) => ErrorCategory::Input,
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::MissingConfigError { .. }
            | AnalyzerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AnalyzerError::CycleDetectionError { .. }
            | AnalyzerError::PathEnumerationError { .. }
            | AnalyzerError::ProcessingError { .. } => ErrorCategory::Analysis,
            AnalyzerError::RenderError(_) => ErrorCategory::Rendering,
        }
    }

    /// 嚴重程度決定退出碼：輸入與配置錯誤一律為 High（退出碼 1）
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Analysis => ErrorSeverity::Medium,
            ErrorCategory::Rendering => ErrorSeverity::Low,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
        }
    }

    /// Bounded preview of the raw input, only present for JSON decode failures.
    pub fn input_preview(&self) -> Option<&str> {
        match self {
            AnalyzerError::JsonDecodeError { preview, .. } => Some(preview),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalyzerError::IoError(e) => format!("Could not read or write a file: {}", e),
            AnalyzerError::JsonDecodeError { source, .. } => {
                format!("The dependency file is not valid JSON: {}", source)
            }
            AnalyzerError::InvalidInputError { message } => {
                format!("The dependency file has an unexpected shape: {}", message)
            }
            AnalyzerError::CsvError(e) => format!("The metrics CSV could not be parsed: {}", e),
            AnalyzerError::ConfigError { message } => format!("Configuration problem: {}", message),
            AnalyzerError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            AnalyzerError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            AnalyzerError::InvalidConfigValueError { field, value, reason } => {
                format!("Setting '{}' has invalid value '{}': {}", field, value, reason)
            }
            AnalyzerError::CycleDetectionError { message } => {
                format!("Cycle detection could not finish: {}", message)
            }
            AnalyzerError::PathEnumerationError { message } => {
                format!("Dependency depth could not be computed: {}", message)
            }
            AnalyzerError::RenderError(e) => format!("Could not render image: {}", e),
            AnalyzerError::ProcessingError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalyzerError::IoError(_) => "Check that the path exists and is readable/writable",
            AnalyzerError::JsonDecodeError { .. } => {
                "Regenerate the dependency file; it may be truncated or mixed with log output"
            }
            AnalyzerError::InvalidInputError { .. } => {
                "The top level must be an object mapping module names to {\"imports\": [...]}"
            }
            AnalyzerError::CsvError(_) => "Make sure the file is a comma-separated metrics export",
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::MissingConfigError { .. }
            | AnalyzerError::InvalidConfigValueError { .. } => {
                "Review the command-line options and the TOML configuration file"
            }
            AnalyzerError::CycleDetectionError { .. } | AnalyzerError::PathEnumerationError { .. } => {
                "The graph is too dense for exhaustive enumeration; analyse a smaller subset"
            }
            AnalyzerError::RenderError(_) => "Re-run with --no-plot to skip the image",
            AnalyzerError::ProcessingError { .. } => "Check the input data for unexpected values",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_exit_with_one() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnalyzerError::JsonDecodeError {
            source,
            preview: "{".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.input_preview(), Some("{"));

        let err = AnalyzerError::MissingConfigError {
            field: "input".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_degraded_errors_are_not_fatal_input() {
        let err = AnalyzerError::CycleDetectionError {
            message: "limit".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.input_preview().is_none());
    }
}
