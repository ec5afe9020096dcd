//! Application configuration

use std::path::PathBuf;

use clap::Args;

use crate::config::{observability::LoggingConfig, storage::StorageConfig};

pub mod observability;
pub mod storage;

/// Catalog source settings.
#[derive(Debug, Clone, Args)]
pub struct CatalogConfig {
    /// YAML catalog fixture to sell from
    #[arg(long, env = "AKIHABARA_CATALOG", default_value = "fixtures/catalog.yaml")]
    pub catalog: PathBuf,
}

/// Akihabara configuration, read from CLI arguments, the environment and `.env`.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Cart persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Catalog source settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
