use crate::config::env::ResolvedEnv;
use crate::domain::model::{StorageAdapterConfig, StorageCredentials};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_required_field, validate_s3_bucket_name, validate_url,
    Validate, ValidationMode, ValidationReport,
};

/// What gets interpolated when `SUPABASE_PROJECT_REF` is unset.
pub const UNSET_PROJECT_REF: &str = "undefined";

pub fn storage_endpoint(project_ref: &str) -> String {
    format!("https://{}.supabase.co/storage/v1", project_ref)
}

/// Assembles the S3 adapter descriptor from the environment snapshot.
///
/// Pure: no network calls, no validation. A missing project reference still
/// produces an endpoint (`https://undefined.supabase.co/storage/v1`) and the
/// failure only shows up when the adapter makes its first request. Run
/// [`Validate::validate`] with [`ValidationMode::Strict`] to catch it early.
pub fn build_storage_adapter(env: &ResolvedEnv) -> StorageAdapterConfig {
    let project_ref = env.project_ref.clone();
    let endpoint = storage_endpoint(project_ref.as_deref().unwrap_or(UNSET_PROJECT_REF));

    tracing::debug!("Storage endpoint: {} (bucket '{}')", endpoint, env.bucket);

    StorageAdapterConfig {
        endpoint,
        credentials: StorageCredentials {
            access_key_id: env.access_key_id.clone(),
            secret_access_key: env.secret_access_key.clone(),
        },
        bucket: env.bucket.clone(),
        region: env.region.clone(),
        force_path_style: env.force_path_style,
        project_ref,
    }
}

impl StorageAdapterConfig {
    pub(crate) fn collect_problems(&self, report: &mut ValidationReport) {
        report.check(validate_required_field("SUPABASE_PROJECT_REF", &self.project_ref).map(|_| ()));
        report.check(validate_url("storage.endpoint", &self.endpoint));
        report.check(validate_non_empty_string(
            "SUPABASE_ACCESS_KEY_ID",
            &self.credentials.access_key_id,
        ));
        report.check(validate_non_empty_string(
            "SUPABASE_SECRET_ACCESS_KEY",
            &self.credentials.secret_access_key,
        ));
        report.check(validate_s3_bucket_name("SUPABASE_BUCKET", &self.bucket));
    }
}

impl Validate for StorageAdapterConfig {
    fn validate(&self, mode: ValidationMode) -> Result<()> {
        let mut report = ValidationReport::new();
        self.collect_problems(&mut report);
        report.finish(mode)
    }
}
