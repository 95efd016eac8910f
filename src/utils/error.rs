use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid tier catalog: {reason}")]
    InvalidCatalog { reason: String },

    #[error("Unknown tier: {id}")]
    UnknownTier { id: String },

    #[error("Volume {volume} is outside the allowed range {min}..={max}")]
    VolumeOutOfRange { volume: i64, min: u32, max: u32 },

    #[error("Quote overflows: {reason}")]
    QuoteOverflow { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Catalog,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdvisorError::IoError(_) => ErrorCategory::Io,
            AdvisorError::SerializationError(_) | AdvisorError::CsvError(_) => {
                ErrorCategory::Output
            }
            AdvisorError::ConfigValidationError { .. }
            | AdvisorError::InvalidConfigValueError { .. }
            | AdvisorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AdvisorError::InvalidCatalog { .. } => ErrorCategory::Catalog,
            AdvisorError::UnknownTier { .. }
            | AdvisorError::VolumeOutOfRange { .. }
            | AdvisorError::QuoteOverflow { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdvisorError::VolumeOutOfRange { .. }
            | AdvisorError::UnknownTier { .. }
            | AdvisorError::QuoteOverflow { .. } => ErrorSeverity::High,
            AdvisorError::IoError(_) => ErrorSeverity::Medium,
            AdvisorError::SerializationError(_) | AdvisorError::CsvError(_) => {
                ErrorSeverity::High
            }
            AdvisorError::ConfigValidationError { .. }
            | AdvisorError::InvalidConfigValueError { .. }
            | AdvisorError::MissingConfigError { .. } => ErrorSeverity::High,
            // 目錄是固定設定，壞掉就無法計價
            AdvisorError::InvalidCatalog { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AdvisorError::IoError(_) => {
                "Check that the file exists and that you have permission to read or write it".to_string()
            }
            AdvisorError::SerializationError(_) | AdvisorError::CsvError(_) => {
                "Retry with --format human or a different output path".to_string()
            }
            AdvisorError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' section of the catalog file; it must be valid TOML", field)
            }
            AdvisorError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            AdvisorError::MissingConfigError { field } => {
                format!("Add the required field '{}' to the catalog file", field)
            }
            AdvisorError::InvalidCatalog { .. } => {
                "Tiers need unique ids, positive prices and strictly ascending daily capacities".to_string()
            }
            AdvisorError::UnknownTier { .. } => {
                "Run `bundle-advisor catalog` to list the available tier ids".to_string()
            }
            AdvisorError::VolumeOutOfRange { min, max, .. } => {
                format!("Pick a daily ticket volume between {} and {}", min, max)
            }
            AdvisorError::QuoteOverflow { .. } => {
                "Quote fewer units per tier".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access a file: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Catalog => format!("The tier catalog cannot be used: {}", self),
            ErrorCategory::Input => format!("The request cannot be priced: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_are_critical() {
        let err = AdvisorError::InvalidCatalog {
            reason: "no tiers".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Catalog);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("no tiers"));
    }

    #[test]
    fn test_volume_error_suggests_range() {
        let err = AdvisorError::VolumeOutOfRange {
            volume: 5,
            min: 50,
            max: 1000,
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.recovery_suggestion().contains("between 50 and 1000"));
        assert_eq!(
            err.to_string(),
            "Volume 5 is outside the allowed range 50..=1000"
        );
    }

    #[test]
    fn test_quote_overflow_is_input_error() {
        let err = AdvisorError::QuoteOverflow {
            reason: "mini line cost".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("cannot be priced"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AdvisorError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
