use crate::config::env::{ResolvedEnv, LOCAL_SERVER_URL};
use crate::config::manifest::SiteManifest;
use crate::config::storage::build_storage_adapter;
use crate::core::jobs::{JobAccessPolicy, JobsConfig};
use crate::domain::model::{
    AdminConfig, CloudStorageBinding, Collection, CollectionRegistration, DatabaseAdapterConfig,
    EditorConfig, Global, ImageProcessor, Plugin, StorageAdapterConfig, MEDIA_SLUG,
};
use crate::utils::error::{Result, SiteConfigError};
use crate::utils::redact::{mask, serialize_optional_secret};
use crate::utils::validation::{
    validate_database_uri, validate_required_field, validate_url, Validate, ValidationMode,
    ValidationReport,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The configuration handed to the CMS framework at startup.
///
/// Built once by [`ConfigAssembler`]; there are no setters.
#[derive(Clone, Serialize)]
pub struct AppConfig {
    admin: AdminConfig,
    import_map_base_dir: PathBuf,
    editor: EditorConfig,
    db: DatabaseAdapterConfig,
    collections: Vec<CollectionRegistration>,
    cors: Vec<String>,
    globals: Vec<Global>,
    plugins: Vec<Plugin>,
    #[serde(serialize_with = "serialize_optional_secret")]
    secret: Option<String>,
    image_processor: ImageProcessor,
    typescript_output_file: PathBuf,
    jobs: JobsConfig,
}

impl AppConfig {
    pub fn admin(&self) -> &AdminConfig {
        &self.admin
    }

    pub fn import_map_base_dir(&self) -> &PathBuf {
        &self.import_map_base_dir
    }

    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    pub fn db(&self) -> &DatabaseAdapterConfig {
        &self.db
    }

    pub fn collections(&self) -> &[CollectionRegistration] {
        &self.collections
    }

    pub fn collection(&self, slug: &str) -> Option<&CollectionRegistration> {
        self.collections.iter().find(|c| c.slug() == slug)
    }

    pub fn cors(&self) -> &[String] {
        &self.cors
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn image_processor(&self) -> ImageProcessor {
        self.image_processor
    }

    pub fn typescript_output_file(&self) -> &PathBuf {
        &self.typescript_output_file
    }

    pub fn jobs(&self) -> &JobsConfig {
        &self.jobs
    }

    /// All cloud-storage bindings across plugins, keyed by collection slug.
    pub fn cloud_storage_bindings(&self) -> BTreeMap<&str, &CloudStorageBinding> {
        self.plugins
            .iter()
            .filter_map(Plugin::cloud_bindings)
            .flat_map(|bindings| bindings.iter().map(|(slug, b)| (slug.as_str(), b)))
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("admin", &self.admin)
            .field("import_map_base_dir", &self.import_map_base_dir)
            .field("editor", &self.editor)
            .field("db", &self.db)
            .field("collections", &self.collections)
            .field("cors", &self.cors)
            .field("globals", &self.globals)
            .field("plugins", &self.plugins)
            .field("secret", &self.secret.as_deref().map(mask))
            .field("image_processor", &self.image_processor)
            .field("typescript_output_file", &self.typescript_output_file)
            .field("jobs", &self.jobs)
            .finish()
    }
}

impl Validate for AppConfig {
    fn validate(&self, mode: ValidationMode) -> Result<()> {
        let mut report = ValidationReport::new();

        report.check(validate_required_field("PAYLOAD_SECRET", &self.secret).map(|_| ()));
        report.check(validate_database_uri("DATABASE_URI", self.db.connection_string()));
        if !self.jobs.access.has_cron_secret() {
            report.check(Err(SiteConfigError::MissingConfigError {
                field: "CRON_SECRET".to_string(),
            }));
        }

        for origin in &self.cors {
            report.check(validate_url("cors", origin));
        }

        for (slug, binding) in self.cloud_storage_bindings() {
            if self.collection(slug).is_none() {
                report.check(Err(SiteConfigError::InvalidConfigValueError {
                    field: "storage.collection".to_string(),
                    value: slug.to_string(),
                    reason: "Cloud storage is bound to a collection that is not registered"
                        .to_string(),
                }));
            }
            binding.adapter.collect_problems(&mut report);
        }

        if report.is_clean() {
            tracing::info!("✅ Site configuration validation passed");
        }
        report.finish(mode)
    }
}

/// Drops unset and empty origins; everything else is kept as-is, in order.
pub fn filter_origins<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: Into<String>,
{
    candidates
        .into_iter()
        .flatten()
        .map(Into::into)
        .filter(|origin: &String| !origin.is_empty())
        .collect()
}

/// Merges site content types, plugins and storage wiring into an [`AppConfig`].
///
/// The pass-through settings (admin, editor, image processor, output paths)
/// default to the stock site and can be replaced from a [`SiteManifest`].
#[derive(Debug, Clone)]
pub struct ConfigAssembler<'a> {
    env: &'a ResolvedEnv,
    admin: AdminConfig,
    base_dir: PathBuf,
    editor: EditorConfig,
    image_processor: ImageProcessor,
    extra_cors: Vec<String>,
    storage_collection: String,
    storage_prefix: Option<String>,
    typescript_output_file: PathBuf,
    job_tasks: Vec<String>,
}

impl<'a> ConfigAssembler<'a> {
    pub fn new(env: &'a ResolvedEnv) -> Self {
        Self::from_manifest(&SiteManifest::default(), env)
    }

    pub fn from_manifest(manifest: &SiteManifest, env: &'a ResolvedEnv) -> Self {
        Self {
            env,
            admin: manifest.admin.clone(),
            base_dir: manifest.base_dir.clone(),
            editor: manifest.editor.clone(),
            image_processor: manifest.image_processor,
            extra_cors: manifest.cors.clone(),
            storage_collection: manifest.storage.collection.clone(),
            storage_prefix: manifest.storage.prefix.clone(),
            typescript_output_file: manifest.typescript_output_file(),
            job_tasks: manifest.jobs.tasks.clone(),
        }
    }

    pub fn assemble(
        &self,
        collections: Vec<Collection>,
        globals: Vec<Global>,
        plugins: Vec<Plugin>,
        storage: StorageAdapterConfig,
    ) -> AppConfig {
        let binding = CloudStorageBinding {
            adapter: storage,
            disable_local_storage: true,
            prefix: self.storage_prefix.clone(),
        };

        if !collections.iter().any(|c| c.slug == self.storage_collection) {
            tracing::warn!(
                "⚠️ Cloud storage is bound to '{}' but no such collection is registered",
                self.storage_collection
            );
        }

        let collections: Vec<CollectionRegistration> = collections
            .into_iter()
            .map(|collection| {
                let storage = (collection.slug == self.storage_collection).then(|| binding.clone());
                CollectionRegistration { collection, storage }
            })
            .collect();

        let mut plugins = plugins;
        plugins.push(Plugin::CloudStorage {
            collections: BTreeMap::from([(self.storage_collection.clone(), binding)]),
        });

        let cors = filter_origins(
            [Some(self.env.server_url()), Some(LOCAL_SERVER_URL.to_string())]
                .into_iter()
                .chain(self.extra_cors.iter().cloned().map(Some)),
        );

        tracing::info!(
            "Assembled site config: {} collections, {} globals, {} plugins",
            collections.len(),
            globals.len(),
            plugins.len()
        );

        AppConfig {
            admin: self.admin.clone(),
            import_map_base_dir: self.base_dir.clone(),
            editor: self.editor.clone(),
            db: DatabaseAdapterConfig::postgres(self.env.database_uri.clone()),
            collections,
            cors,
            globals,
            plugins,
            secret: self.env.payload_secret.clone(),
            image_processor: self.image_processor,
            typescript_output_file: self.typescript_output_file.clone(),
            jobs: JobsConfig {
                access: JobAccessPolicy::new(self.env.cron_secret.clone()),
                tasks: self.job_tasks.clone(),
            },
        }
    }
}

pub fn assemble_config(
    collections: Vec<Collection>,
    globals: Vec<Global>,
    plugins: Vec<Plugin>,
    storage: StorageAdapterConfig,
    env: &ResolvedEnv,
) -> AppConfig {
    ConfigAssembler::new(env).assemble(collections, globals, plugins, storage)
}

/// Environment snapshot + manifest → storage adapter → assembled config.
pub fn assemble_from_manifest(manifest: &SiteManifest, env: &ResolvedEnv) -> AppConfig {
    let storage = build_storage_adapter(env);
    let plugins = manifest.plugins.iter().map(Plugin::named).collect();

    ConfigAssembler::from_manifest(manifest, env).assemble(
        manifest.collections.clone(),
        manifest.globals.clone(),
        plugins,
        storage,
    )
}
