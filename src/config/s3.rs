#[cfg(feature = "s3")]
use crate::domain::model::StorageAdapterConfig;
#[cfg(feature = "s3")]
use crate::utils::error::{Result, SiteConfigError};
#[cfg(feature = "s3")]
use aws_config::BehaviorVersion;
#[cfg(feature = "s3")]
use aws_sdk_s3::config::{Credentials, Region};
#[cfg(feature = "s3")]
use aws_sdk_s3::error::ProvideErrorMetadata;
#[cfg(feature = "s3")]
use aws_sdk_s3::Client as S3Client;

#[cfg(feature = "s3")]
impl StorageAdapterConfig {
    /// Builds an S3 client pointed at the Supabase storage endpoint.
    pub fn s3_client(&self) -> S3Client {
        let credentials = Credentials::new(
            self.credentials.access_key_id.clone(),
            self.credentials.secret_access_key.clone(),
            None,
            None,
            "site-config",
        );

        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(self.region.clone()))
            .endpoint_url(&self.endpoint)
            .force_path_style(self.force_path_style)
            .build();

        S3Client::from_conf(config)
    }
}

/// Issues a `HeadBucket` so misconfigured storage fails now rather than on
/// the first upload.
#[cfg(feature = "s3")]
pub async fn probe_bucket(client: &S3Client, bucket: &str) -> Result<()> {
    tracing::info!("🔍 Probing storage bucket '{}'", bucket);

    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => {
            tracing::info!("✅ Bucket '{}' is reachable", bucket);
            Ok(())
        }
        Err(err) => {
            let service_err = err.into_service_error();
            let code = service_err.code().unwrap_or("unknown").to_string();
            tracing::error!("❌ HeadBucket failed for '{}': {:?}", bucket, service_err);
            Err(SiteConfigError::StorageError {
                message: format!("HeadBucket on '{}' failed ({}): {}", bucket, code, service_err),
            })
        }
    }
}

#[cfg(feature = "s3")]
pub async fn probe_storage(adapter: &StorageAdapterConfig) -> Result<()> {
    probe_bucket(&adapter.s3_client(), &adapter.bucket).await
}
