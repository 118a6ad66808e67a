pub mod env;
pub mod manifest;
pub mod s3;
pub mod storage;

pub use env::ResolvedEnv;
pub use manifest::SiteManifest;
pub use storage::build_storage_adapter;
