#![cfg(feature = "s3")]

use httpmock::prelude::*;
use httpmock::Method::HEAD;
use site_config::domain::model::{StorageAdapterConfig, StorageCredentials};
use site_config::{probe_storage, SiteConfigError};

fn adapter_for(endpoint: String) -> StorageAdapterConfig {
    StorageAdapterConfig {
        endpoint,
        credentials: StorageCredentials {
            access_key_id: "s3-key-id".to_string(),
            secret_access_key: "service-role-secret".to_string(),
        },
        bucket: "site-media".to_string(),
        region: "us-east-1".to_string(),
        force_path_style: true,
        project_ref: Some("local".to_string()),
    }
}

#[tokio::test]
async fn test_probe_succeeds_when_bucket_exists() {
    let server = MockServer::start_async().await;
    let bucket_mock = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/storage/v1/site-media");
            then.status(200);
        })
        .await;

    let result = probe_storage(&adapter_for(server.url("/storage/v1"))).await;

    assert!(result.is_ok(), "{:?}", result);
    bucket_mock.assert_async().await;
}

#[tokio::test]
async fn test_probe_reports_missing_bucket() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/storage/v1/site-media");
            then.status(404);
        })
        .await;

    let result = probe_storage(&adapter_for(server.url("/storage/v1"))).await;

    assert!(matches!(result, Err(SiteConfigError::StorageError { .. })));
}
