use crate::domain::model::{AdminConfig, Collection, EditorConfig, Global, ImageProcessor, MEDIA_SLUG};
use crate::domain::ports::EnvSource;
use crate::utils::error::{Result, SiteConfigError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative description of the site: which collections, globals and
/// plugins exist, plus the pass-through admin and editor settings.
///
/// Every section is optional in the TOML file; missing sections take the
/// values of [`SiteManifest::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteManifest {
    /// Directory the import map and generated types are resolved against.
    pub base_dir: PathBuf,
    pub admin: AdminConfig,
    pub collections: Vec<Collection>,
    pub globals: Vec<Global>,
    /// Plugins configured elsewhere, registered by name ahead of cloud storage.
    pub plugins: Vec<String>,
    pub editor: EditorConfig,
    pub image_processor: ImageProcessor,
    /// Extra CORS origins appended after the server URL and localhost.
    pub cors: Vec<String>,
    pub storage: StorageSection,
    pub typescript: TypescriptSection,
    pub jobs: JobsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub collection: String,
    pub prefix: Option<String>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            collection: MEDIA_SLUG.to_string(),
            prefix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypescriptSection {
    pub output_file: String,
}

impl Default for TypescriptSection {
    fn default() -> Self {
        Self {
            output_file: "payload-types.ts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsSection {
    pub tasks: Vec<String>,
}

impl Default for SiteManifest {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("src"),
            admin: AdminConfig::default(),
            collections: vec![
                Collection::new("pages"),
                Collection::new("posts"),
                Collection::new(MEDIA_SLUG).upload(),
                Collection::new("categories"),
                Collection::new("users").auth(),
                Collection::new("services"),
                Collection::new("testimonials"),
                Collection::new("portfolio"),
            ],
            globals: vec![Global::new("header"), Global::new("footer")],
            plugins: Vec::new(),
            editor: EditorConfig::default(),
            image_processor: ImageProcessor::default(),
            cors: Vec::new(),
            storage: StorageSection::default(),
            typescript: TypescriptSection::default(),
            jobs: JobsSection::default(),
        }
    }
}

impl SiteManifest {
    /// Loads a manifest file, substituting `${VAR}` from `env`.
    pub fn from_file<P: AsRef<Path>, E: EnvSource + ?Sized>(path: P, env: &E) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loaded manifest from {}", path.as_ref().display());
        Self::from_toml_str(&content, env)
    }

    pub fn from_toml_str<E: EnvSource + ?Sized>(content: &str, env: &E) -> Result<Self> {
        let processed = substitute_env_vars(content, env)?;
        Ok(toml::from_str(&processed)?)
    }

    pub fn typescript_output_file(&self) -> PathBuf {
        self.base_dir.join(&self.typescript.output_file)
    }
}

/// Replaces `${VAR}` with the value from `env`; unknown variables are left
/// in place.
fn substitute_env_vars<E: EnvSource + ?Sized>(content: &str, env: &E) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteConfigError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env.var(var_name)
            .unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
