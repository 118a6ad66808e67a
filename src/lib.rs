pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "s3")]
pub use config::s3::{probe_bucket, probe_storage};

pub use config::{build_storage_adapter, ResolvedEnv, SiteManifest};
pub use core::assembler::{assemble_config, assemble_from_manifest, AppConfig, ConfigAssembler};
pub use core::jobs::{JobAccessPolicy, JobDecision, JobRequest};
pub use domain::ports::{EnvSource, ProcessEnv};
pub use utils::error::{Result, SiteConfigError};
pub use utils::validation::{Validate, ValidationMode};
