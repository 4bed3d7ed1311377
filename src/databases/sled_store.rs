//! Sled-backed storage for mapped values.
//!
//! Each value is encoded into a [`Record`] through its mapping declaration,
//! and the record's bytes are stored under the value's id in a single sled
//! tree. Reading decodes the record and runs whatever migrations it predates,
//! so data written by older builds upgrades transparently on load.
//!
//! # Examples
//!
//! ```
//! use netabase_mappings::prelude::*;
//! use netabase_mappings::databases::sled_store::SledStore;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Mappable for User {
//!     fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
//!         mapper.bind(&mut self.name, "name")?;
//!         mapper.bind(&mut self.age, "age")
//!     }
//! }
//!
//! let store = SledStore::temp().unwrap();
//! store.put("alice", &mut User { name: "Alice".into(), age: 30 }).unwrap();
//!
//! let alice: Option<User> = store.get("alice").unwrap();
//! assert_eq!(alice, Some(User { name: "Alice".into(), age: 30 }));
//! ```

use log::debug;

use crate::config::StoreConfig;
use crate::error::MappingResult;
use crate::mappings::Mappings;
use crate::record::Record;
use crate::traits::mappable::Mappable;

/// Keyed store of mapped values on top of a sled tree.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    tree: sled::Tree,
    mappings: Mappings,
    use_fsync: bool,
}

impl SledStore {
    /// Open a store with the given configuration
    pub fn open(config: &StoreConfig) -> MappingResult<Self> {
        debug!(
            "opening sled store at {} (tree '{}')",
            config.path.display(),
            config.tree_name
        );
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity_bytes)
            .temporary(config.temporary)
            .open()?;
        let tree = db.open_tree(config.tree_name.as_bytes())?;
        Ok(Self {
            db,
            tree,
            mappings: Mappings::default(),
            use_fsync: config.use_fsync,
        })
    }

    /// Create a temporary store (useful for testing)
    pub fn temp() -> MappingResult<Self> {
        Self::open(&StoreConfig::temp())
    }

    /// Use a non-default mapping configuration for encode and decode.
    pub fn with_mappings(mut self, mappings: Mappings) -> Self {
        self.mappings = mappings;
        self
    }

    /// Get direct access to the underlying sled database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Encode `value` and store it under `id`, replacing any previous record.
    pub fn put<T: Mappable>(&self, id: &str, value: &mut T) -> MappingResult<()> {
        let mut record = Record::new();
        self.mappings.encode(value, &mut record)?;
        self.put_record(id, &record)
    }

    /// Store a raw record under `id`.
    pub fn put_record(&self, id: &str, record: &Record) -> MappingResult<()> {
        debug!("storing record '{}' ({} keys)", id, record.len());
        self.tree.insert(id.as_bytes(), record.to_bytes()?)?;
        if self.use_fsync {
            self.tree.flush()?;
        }
        Ok(())
    }

    /// Decode a fresh `T` from the record under `id`.
    pub fn get<T: Mappable + Default>(&self, id: &str) -> MappingResult<Option<T>> {
        let mut value = T::default();
        Ok(self.load_into(id, &mut value)?.then_some(value))
    }

    /// Decode the record under `id` into an existing value.
    ///
    /// Returns `false`, leaving `value` alone, when there is no such record.
    pub fn load_into<T: Mappable>(&self, id: &str, value: &mut T) -> MappingResult<bool> {
        match self.record(id)? {
            Some(record) => {
                self.mappings.decode(value, &record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The raw record under `id`.
    pub fn record(&self, id: &str) -> MappingResult<Option<Record>> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Record::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove the record under `id`, returning whether one existed.
    pub fn remove(&self, id: &str) -> MappingResult<bool> {
        Ok(self.tree.remove(id.as_bytes())?.is_some())
    }

    pub fn contains(&self, id: &str) -> MappingResult<bool> {
        Ok(self.tree.contains_key(id.as_bytes())?)
    }

    /// All stored ids, in byte order.
    pub fn ids(&self) -> MappingResult<Vec<String>> {
        self.tree
            .iter()
            .keys()
            .map(|key| -> MappingResult<String> { Ok(String::from_utf8_lossy(&key?).into_owned()) })
            .collect()
    }

    /// Get the number of records in the store
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clear all records from the store
    pub fn clear(&self) -> MappingResult<()> {
        self.tree.clear()?;
        Ok(())
    }

    /// Flush the database to disk
    pub fn flush(&self) -> MappingResult<usize> {
        Ok(self.db.flush()?)
    }
}
