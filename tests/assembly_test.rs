use site_config::config::env::*;
use site_config::domain::model::{Collection, Global, Plugin, MEDIA_SLUG};
use site_config::{
    assemble_config, assemble_from_manifest, build_storage_adapter, ResolvedEnv, SiteConfigError,
    SiteManifest, Validate, ValidationMode,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn env_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn production_env() -> HashMap<String, String> {
    env_with(&[
        (SUPABASE_PROJECT_REF, "abc123"),
        (SUPABASE_ACCESS_KEY_ID, "s3-key-id"),
        (SUPABASE_SECRET_ACCESS_KEY, "service-role-secret"),
        (SUPABASE_BUCKET, "site-media"),
        (DATABASE_URI, "postgresql://site:pw@db.abc123.supabase.co:5432/postgres"),
        (PAYLOAD_SECRET, "payload-secret"),
        (CRON_SECRET, "cron-secret"),
        (VERCEL_PROJECT_PRODUCTION_URL, "site.vercel.app"),
    ])
}

#[test]
fn test_exactly_one_collection_uses_cloud_storage() {
    let env = ResolvedEnv::resolve(&production_env());
    let config = assemble_from_manifest(&SiteManifest::default(), &env);

    assert_eq!(config.collections().len(), 8);
    for registration in config.collections() {
        if registration.slug() == MEDIA_SLUG {
            let binding = registration.storage.as_ref().unwrap();
            assert!(binding.disable_local_storage);
            assert_eq!(binding.adapter.bucket, "site-media");
        } else {
            assert!(!registration.uses_cloud_storage(), "{} bound", registration.slug());
        }
    }

    let cloud_plugins = config
        .plugins()
        .iter()
        .filter(|p| p.cloud_bindings().is_some())
        .count();
    assert_eq!(cloud_plugins, 1);
    assert_eq!(config.cloud_storage_bindings().len(), 1);
}

#[test]
fn test_cors_origins_skip_empty_entries_in_order() {
    let mut env = production_env();
    env.insert("PREVIEW_ORIGIN".to_string(), "https://preview.example.com".to_string());
    env.insert("EMPTY_ORIGIN".to_string(), String::new());

    let manifest = SiteManifest::from_toml_str(
        r#"cors = ["${EMPTY_ORIGIN}", "${PREVIEW_ORIGIN}", ""]"#,
        &env,
    )
    .unwrap();
    let config = assemble_from_manifest(&manifest, &ResolvedEnv::resolve(&env));

    assert_eq!(
        config.cors(),
        [
            "https://site.vercel.app",
            "http://localhost:3000",
            "https://preview.example.com"
        ]
    );
}

#[test]
fn test_plugins_are_passed_through_before_cloud_storage() {
    let env = ResolvedEnv::resolve(&production_env());
    let config = assemble_config(
        vec![Collection::new("media").upload(), Collection::new("users").auth()],
        vec![Global::new("header")],
        vec![Plugin::named("seo"), Plugin::named("form-builder")],
        build_storage_adapter(&env),
        &env,
    );

    let names: Vec<String> = config
        .plugins()
        .iter()
        .map(|p| match p {
            Plugin::Named { name } => name.clone(),
            Plugin::CloudStorage { .. } => "cloud-storage".to_string(),
        })
        .collect();
    assert_eq!(names, vec!["seo", "form-builder", "cloud-storage"]);
    assert_eq!(config.globals(), [Global::new("header")]);
}

#[test]
fn test_strict_validation_surfaces_fail_late_problems() {
    let missing_storage = env_with(&[
        (DATABASE_URI, "postgres://db/site"),
        (PAYLOAD_SECRET, "payload-secret"),
        (CRON_SECRET, "cron-secret"),
    ]);
    let config = assemble_from_manifest(
        &SiteManifest::default(),
        &ResolvedEnv::resolve(&missing_storage),
    );

    assert!(config.validate(ValidationMode::Permissive).is_ok());
    let err = config.validate(ValidationMode::Strict).unwrap_err();
    assert!(matches!(
        err,
        SiteConfigError::MissingConfigError { ref field } if field == "SUPABASE_PROJECT_REF"
    ));
}

#[test]
fn test_strict_validation_requires_payload_secret() {
    let mut env = production_env();
    env.remove(PAYLOAD_SECRET);
    let config = assemble_from_manifest(&SiteManifest::default(), &ResolvedEnv::resolve(&env));

    let err = config.validate(ValidationMode::Strict).unwrap_err();
    assert!(matches!(
        err,
        SiteConfigError::MissingConfigError { ref field } if field == "PAYLOAD_SECRET"
    ));
}

#[test]
fn test_production_env_passes_strict_validation() {
    let config = assemble_from_manifest(
        &SiteManifest::default(),
        &ResolvedEnv::resolve(&production_env()),
    );
    assert!(config.validate(ValidationMode::Strict).is_ok());
}

#[test]
fn test_manifest_file_drives_assembly() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(
            br#"
base_dir = "app"
plugins = ["seo"]

[[collections]]
slug = "media"
upload = true

[[collections]]
slug = "users"
auth = true

[[globals]]
slug = "footer"

[storage]
prefix = "${MEDIA_PREFIX}"

[jobs]
tasks = ["rebuild-sitemap"]
"#,
        )
        .unwrap();

    let mut env = production_env();
    env.insert("MEDIA_PREFIX".to_string(), "media".to_string());

    let manifest = SiteManifest::from_file(temp_file.path(), &env).unwrap();
    let config = assemble_from_manifest(&manifest, &ResolvedEnv::resolve(&env));

    assert_eq!(config.collections().len(), 2);
    assert_eq!(config.globals(), [Global::new("footer")]);
    assert_eq!(
        config.cloud_storage_bindings()[MEDIA_SLUG].prefix.as_deref(),
        Some("media")
    );
    assert_eq!(config.jobs().tasks, vec!["rebuild-sitemap"]);
    assert_eq!(
        config.typescript_output_file(),
        &std::path::PathBuf::from("app/payload-types.ts")
    );
    assert_eq!(config.import_map_base_dir(), &std::path::PathBuf::from("app"));
}

#[test]
fn test_bundled_site_manifest_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/site.toml");
    let manifest = SiteManifest::from_file(path, &HashMap::<String, String>::new()).unwrap();

    assert_eq!(manifest, SiteManifest::default());
}
