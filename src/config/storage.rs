//! Storage Config

use std::path::PathBuf;

use clap::Args;

use crate::{cart::codec::DEFAULT_CART_KEY, storage::FileStorage};

/// Cart persistence settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory the cart is persisted in
    #[arg(long, env = "AKIHABARA_DATA_DIR", default_value = ".akihabara")]
    pub data_dir: PathBuf,

    /// Storage key the cart is persisted under
    #[arg(long, env = "AKIHABARA_CART_KEY", default_value = DEFAULT_CART_KEY)]
    pub cart_key: String,
}

impl StorageConfig {
    /// File storage rooted at the configured data directory.
    #[must_use]
    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}
