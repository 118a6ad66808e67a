use crate::utils::redact::{mask, serialize_secret};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Slug of the upload collection routed to object storage.
pub const MEDIA_SLUG: &str = "media";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub slug: String,
    #[serde(default)]
    pub upload: bool,
    #[serde(default)]
    pub auth: bool,
}

impl Collection {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            upload: false,
            auth: false,
        }
    }

    pub fn upload(mut self) -> Self {
        self.upload = true;
        self
    }

    pub fn auth(mut self) -> Self {
        self.auth = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Global {
    pub slug: String,
}

impl Global {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

/// A collection as registered with the framework, with its storage binding if any.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionRegistration {
    #[serde(flatten)]
    pub collection: Collection,
    pub storage: Option<CloudStorageBinding>,
}

impl CollectionRegistration {
    pub fn slug(&self) -> &str {
        &self.collection.slug
    }

    pub fn uses_cloud_storage(&self) -> bool {
        self.storage.is_some()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct StorageCredentials {
    pub access_key_id: String,
    /// Service-role secret; it authorizes writes to the bucket.
    #[serde(serialize_with = "serialize_secret")]
    pub secret_access_key: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &mask(&self.secret_access_key))
            .finish()
    }
}

/// Descriptor handed to the S3-compatible storage adapter. Nothing here talks
/// to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageAdapterConfig {
    pub endpoint: String,
    pub credentials: StorageCredentials,
    pub bucket: String,
    pub region: String,
    pub force_path_style: bool,
    /// The project reference the endpoint was built from, `None` when unset.
    pub project_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloudStorageBinding {
    pub adapter: StorageAdapterConfig,
    pub disable_local_storage: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum Plugin {
    /// A plugin configured elsewhere and passed through by name.
    Named { name: String },
    CloudStorage {
        collections: BTreeMap<String, CloudStorageBinding>,
    },
}

impl Plugin {
    pub fn named(name: impl Into<String>) -> Self {
        Plugin::Named { name: name.into() }
    }

    pub fn cloud_bindings(&self) -> Option<&BTreeMap<String, CloudStorageBinding>> {
        match self {
            Plugin::CloudStorage { collections } => Some(collections),
            Plugin::Named { .. } => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "adapter", rename_all = "lowercase")]
pub enum DatabaseAdapterConfig {
    Postgres {
        #[serde(serialize_with = "serialize_secret")]
        connection_string: String,
    },
}

impl DatabaseAdapterConfig {
    pub fn postgres(connection_string: impl Into<String>) -> Self {
        DatabaseAdapterConfig::Postgres {
            connection_string: connection_string.into(),
        }
    }

    pub fn connection_string(&self) -> &str {
        match self {
            DatabaseAdapterConfig::Postgres { connection_string } => connection_string,
        }
    }
}

impl fmt::Debug for DatabaseAdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseAdapterConfig::Postgres { connection_string } => f
                .debug_struct("Postgres")
                .field("connection_string", &mask(connection_string))
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub kind: String,
    pub features: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            kind: "lexical".to_string(),
            features: Vec::new(),
        }
    }
}

/// Image library handle passed through to the framework untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProcessor {
    #[default]
    Sharp,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub label: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Breakpoint {
    pub fn new(label: &str, name: &str, width: u32, height: u32) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            width,
            height,
        }
    }
}

pub fn default_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint::new("Mobile", "mobile", 375, 667),
        Breakpoint::new("Tablet", "tablet", 768, 1024),
        Breakpoint::new("Desktop", "desktop", 1440, 900),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Slug of the auth collection used for admin login.
    pub user: String,
    pub before_login: Vec<String>,
    pub before_dashboard: Vec<String>,
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user: "users".to_string(),
            before_login: vec!["@/components/BeforeLogin".to_string()],
            before_dashboard: vec!["@/components/BeforeDashboard".to_string()],
            breakpoints: default_breakpoints(),
        }
    }
}
