use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Manifest parsing error: {0}")]
    ManifestError(#[from] toml::de::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code the CLI uses for a failure of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SiteConfigError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteConfigError::IoError(_) => ErrorCategory::Io,
            SiteConfigError::StorageError { .. } => ErrorCategory::Storage,
            _ => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // remote storage can recover on its own; try again later
            SiteConfigError::StorageError { .. } => ErrorSeverity::Medium,
            SiteConfigError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteConfigError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            SiteConfigError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            SiteConfigError::ManifestError(_) => "The site manifest could not be parsed".to_string(),
            SiteConfigError::StorageError { .. } => {
                "The storage bucket could not be reached".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SiteConfigError::MissingConfigError { field } => {
                format!("Set the {} environment variable before starting", field)
            }
            SiteConfigError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of {} in the deployment environment", field)
            }
            SiteConfigError::ManifestError(_) => {
                "Check the TOML syntax of the manifest file".to_string()
            }
            SiteConfigError::IoError(_) => "Check that the file exists and is readable".to_string(),
            SiteConfigError::StorageError { .. } => {
                "Verify SUPABASE_PROJECT_REF, the S3 access keys and the bucket name".to_string()
            }
            _ => "Review the configuration and try again".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_high_severity() {
        let err = SiteConfigError::MissingConfigError {
            field: "PAYLOAD_SECRET".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("PAYLOAD_SECRET"));
    }

    #[test]
    fn test_storage_error_is_retryable() {
        let err = SiteConfigError::StorageError {
            message: "timeout".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_exit_code_per_severity() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);

        let missing = SiteConfigError::MissingConfigError {
            field: "DATABASE_URI".to_string(),
        };
        assert_eq!(missing.severity().exit_code(), 1);

        let io = SiteConfigError::IoError(std::io::Error::other("disk"));
        assert_eq!(io.severity().exit_code(), 3);
    }
}
