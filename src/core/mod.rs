pub mod assembler;
pub mod jobs;

pub use crate::domain::model::{Collection, Global, Plugin, StorageAdapterConfig};
pub use crate::domain::ports::EnvSource;
pub use crate::utils::error::Result;
