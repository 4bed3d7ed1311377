//! Configuration for the mapping engine and the storage adaptors.
//!
//! Both configs are built with `typed-builder`; every field has a default.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::mappings::VERSION_KEY;

/// Behaviour of [`Mappings`](crate::Mappings) encode and decode.
///
/// # Examples
///
/// ```
/// use netabase_mappings::config::MappingsConfig;
///
/// let config = MappingsConfig::default();
/// assert_eq!(config.version_key, "__mappings_ver");
/// assert!(config.validate_migrations);
///
/// let config = MappingsConfig::builder()
///     .version_key("schema")
///     .always_write_version(true)
///     .build();
/// assert_eq!(config.version_key, "schema");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct MappingsConfig {
    /// Reserved key holding the schema version of a payload
    #[builder(default = String::from(VERSION_KEY), setter(into))]
    pub version_key: String,

    /// Dry-run the whole migration history before decoding, so invalid
    /// operations surface before any field is written
    #[builder(default = true)]
    pub validate_migrations: bool,

    /// Write the version marker even for types without migrations
    #[builder(default = false)]
    pub always_write_version: bool,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Configuration for the sled-backed record store.
///
/// # Examples
///
/// ```
/// use netabase_mappings::config::StoreConfig;
///
/// let config = StoreConfig::builder()
///     .path("/data/records")
///     .tree_name("posts")
///     .build();
/// assert!(!config.temporary);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct StoreConfig {
    /// Path to the database directory
    #[builder(setter(into))]
    pub path: PathBuf,

    /// Tree holding one encoded record per id
    #[builder(default = String::from("records"), setter(into))]
    pub tree_name: String,

    /// Page cache size in bytes
    #[builder(default = 64 * 1024 * 1024)]
    pub cache_capacity_bytes: u64,

    /// Remove the database when the store is dropped
    #[builder(default = false)]
    pub temporary: bool,

    /// Flush after every write (may impact performance)
    #[builder(default = false)]
    pub use_fsync: bool,
}

impl StoreConfig {
    /// Create a basic configuration with just a path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::builder().path(path).build()
    }

    /// Create configuration for a temporary database
    pub fn temp() -> Self {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "netabase_mappings_{}_{}",
            std::process::id(),
            n
        ));
        Self::builder().path(path).temporary(true).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_defaults() {
        let config = StoreConfig::new("/tmp/somewhere");
        assert_eq!(config.tree_name, "records");
        assert_eq!(config.cache_capacity_bytes, 64 * 1024 * 1024);
        assert!(!config.use_fsync);
    }

    #[test]
    fn configs_survive_serde() {
        use bincode::config::standard;

        let mappings = MappingsConfig::builder()
            .version_key("v")
            .always_write_version(true)
            .build();
        let bytes = bincode::serde::encode_to_vec(&mappings, standard()).unwrap();
        let (back, _): (MappingsConfig, usize) =
            bincode::serde::decode_from_slice(&bytes, standard()).unwrap();
        assert_eq!(back, mappings);
        assert!(back.validate_migrations);

        let store = StoreConfig::builder()
            .path("/tmp/store")
            .tree_name("posts")
            .use_fsync(true)
            .build();
        let bytes = bincode::serde::encode_to_vec(&store, standard()).unwrap();
        let (back, _): (StoreConfig, usize) =
            bincode::serde::decode_from_slice(&bytes, standard()).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn temp_paths_are_unique() {
        let a = StoreConfig::temp();
        let b = StoreConfig::temp();
        assert!(a.temporary);
        assert_ne!(a.path, b.path);
    }
}
