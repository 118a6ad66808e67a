use crate::utils::error::{Result, SiteConfigError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

pub trait Validate {
    fn validate(&self, mode: ValidationMode) -> Result<()>;
}

/// How configuration problems are surfaced.
///
/// `Permissive` keeps the historical fail-late behaviour: problems are logged
/// and startup continues, so a bad bucket or project reference only shows up
/// on the first upload. `Strict` turns the first problem into an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Permissive,
    Strict,
}

impl FromStr for ValidationMode {
    type Err = SiteConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" | "" => Ok(ValidationMode::Permissive),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(SiteConfigError::InvalidConfigValueError {
                field: "CONFIG_VALIDATION".to_string(),
                value: other.to_string(),
                reason: "Expected 'permissive' or 'strict'".to_string(),
            }),
        }
    }
}

/// Collects problems found while checking a configuration.
#[derive(Debug, Default)]
pub struct ValidationReport {
    problems: Vec<SiteConfigError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, outcome: Result<()>) {
        if let Err(e) = outcome {
            self.problems.push(e);
        }
    }

    pub fn problems(&self) -> &[SiteConfigError] {
        &self.problems
    }

    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn finish(self, mode: ValidationMode) -> Result<()> {
        match mode {
            ValidationMode::Strict => match self.problems.into_iter().next() {
                Some(first) => Err(first),
                None => Ok(()),
            },
            ValidationMode::Permissive => {
                for problem in &self.problems {
                    tracing::warn!("⚠️ {} (continuing in permissive mode)", problem);
                }
                Ok(())
            }
        }
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SiteConfigError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_database_uri(field_name: &str, uri: &str) -> Result<()> {
    validate_non_empty_string(field_name, uri)?;

    let url = Url::parse(uri).map_err(|e| SiteConfigError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: "<redacted>".to_string(),
        reason: format!("Invalid connection string: {}", e),
    })?;

    match url.scheme() {
        "postgres" | "postgresql" => Ok(()),
        scheme => Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: format!("Expected a postgres:// connection string, got {}://", scheme),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| SiteConfigError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.is_empty() {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "Bucket name cannot be empty".to_string(),
        });
    }

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "Bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "Bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(SiteConfigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "Bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}
