use crate::domain::ports::{EnvSource, ProcessEnv};
use crate::utils::redact::mask;
use crate::utils::validation::ValidationMode;
use std::fmt;

pub const SUPABASE_PROJECT_REF: &str = "SUPABASE_PROJECT_REF";
pub const SUPABASE_ACCESS_KEY_ID: &str = "SUPABASE_ACCESS_KEY_ID";
pub const SUPABASE_SECRET_ACCESS_KEY: &str = "SUPABASE_SECRET_ACCESS_KEY";
pub const SUPABASE_BUCKET: &str = "SUPABASE_BUCKET";
pub const SUPABASE_REGION: &str = "SUPABASE_REGION";
pub const SUPABASE_FORCE_PATH_STYLE: &str = "SUPABASE_FORCE_PATH_STYLE";
pub const DATABASE_URI: &str = "DATABASE_URI";
pub const PAYLOAD_SECRET: &str = "PAYLOAD_SECRET";
pub const CRON_SECRET: &str = "CRON_SECRET";
pub const NEXT_PUBLIC_SERVER_URL: &str = "NEXT_PUBLIC_SERVER_URL";
pub const VERCEL_PROJECT_PRODUCTION_URL: &str = "VERCEL_PROJECT_PRODUCTION_URL";
pub const CONFIG_VALIDATION: &str = "CONFIG_VALIDATION";

pub const DEFAULT_ACCESS_KEY_ID: &str = "service_role";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const LOCAL_SERVER_URL: &str = "http://localhost:3000";

/// Immutable snapshot of every environment value the site configuration uses.
///
/// Built once at startup. Fallbacks are applied here but nothing is validated:
/// an empty bucket or a missing project reference is carried forward as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedEnv {
    pub project_ref: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    pub force_path_style: bool,
    pub database_uri: String,
    pub payload_secret: Option<String>,
    pub cron_secret: Option<String>,
    pub public_server_url: Option<String>,
    pub vercel_production_url: Option<String>,
    pub validation_mode: ValidationMode,
}

/// Set and non-empty, otherwise `None`.
fn present<E: EnvSource + ?Sized>(source: &E, key: &str) -> Option<String> {
    source.var(key).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!("⚠️ {} has unrecognised value '{}', using default", key, raw);
            None
        }
    }
}

impl ResolvedEnv {
    pub fn resolve<E: EnvSource + ?Sized>(source: &E) -> Self {
        let validation_mode = match present(source, CONFIG_VALIDATION) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("⚠️ {}; falling back to permissive validation", e);
                ValidationMode::Permissive
            }),
            None => ValidationMode::Permissive,
        };

        let resolved = Self {
            project_ref: present(source, SUPABASE_PROJECT_REF),
            access_key_id: present(source, SUPABASE_ACCESS_KEY_ID)
                .unwrap_or_else(|| DEFAULT_ACCESS_KEY_ID.to_string()),
            secret_access_key: present(source, SUPABASE_SECRET_ACCESS_KEY).unwrap_or_default(),
            bucket: present(source, SUPABASE_BUCKET).unwrap_or_default(),
            region: present(source, SUPABASE_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            force_path_style: present(source, SUPABASE_FORCE_PATH_STYLE)
                .and_then(|raw| parse_bool(SUPABASE_FORCE_PATH_STYLE, &raw))
                .unwrap_or(true),
            database_uri: present(source, DATABASE_URI).unwrap_or_default(),
            payload_secret: present(source, PAYLOAD_SECRET),
            cron_secret: present(source, CRON_SECRET),
            public_server_url: present(source, NEXT_PUBLIC_SERVER_URL),
            vercel_production_url: present(source, VERCEL_PROJECT_PRODUCTION_URL),
            validation_mode,
        };

        tracing::debug!("Resolved environment: {:?}", resolved);
        resolved
    }

    pub fn from_process_env() -> Self {
        Self::resolve(&ProcessEnv)
    }

    /// Public URL of the site: the explicit server URL, then the Vercel
    /// production host, then localhost.
    pub fn server_url(&self) -> String {
        if let Some(url) = &self.public_server_url {
            return url.clone();
        }
        if let Some(host) = &self.vercel_production_url {
            return format!("https://{}", host);
        }
        LOCAL_SERVER_URL.to_string()
    }
}

impl fmt::Debug for ResolvedEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedEnv")
            .field("project_ref", &self.project_ref)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &mask(&self.secret_access_key))
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("database_uri", &mask(&self.database_uri))
            .field("payload_secret", &self.payload_secret.as_deref().map(mask))
            .field("cron_secret", &self.cron_secret.as_deref().map(mask))
            .field("public_server_url", &self.public_server_url)
            .field("vercel_production_url", &self.vercel_production_url)
            .field("validation_mode", &self.validation_mode)
            .finish()
    }
}
