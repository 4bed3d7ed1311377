//! In-memory keyed record and its byte form.
//!
//! [`Record`] is the simplest storage capability: an ordered map from keys to
//! [`StoredValue`]s that implements both [`Reader`] and [`Writer`]. Its
//! bincode encoding is what [`archive`] produces and what the sled backend
//! stores per id.

use std::collections::BTreeMap;

use bincode::config::standard;
use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};
use crate::mappings::Mappings;
use crate::traits::mappable::Mappable;
use crate::traits::store::{Reader, Writer};
use crate::value::StoredValue;

#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Record {
    values: BTreeMap<String, StoredValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: StoredValue) -> Option<StoredValue> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<StoredValue> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_bytes(&self) -> MappingResult<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, standard())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> MappingResult<Self> {
        let (record, read) = bincode::decode_from_slice(bytes, standard())?;
        if read != bytes.len() {
            return Err(MappingError::TrailingBytes {
                trailing: bytes.len() - read,
            });
        }
        Ok(record)
    }
}

impl Reader for Record {
    fn read_value(&self, key: &str) -> MappingResult<Option<StoredValue>> {
        Ok(self.values.get(key).cloned())
    }

    fn contains_key(&self, key: &str) -> MappingResult<bool> {
        Ok(self.values.contains_key(key))
    }
}

impl Writer for Record {
    fn write_value(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_owned(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, StoredValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, StoredValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Encode `value` into a standalone byte archive.
pub fn archive<T: Mappable>(value: &mut T) -> MappingResult<Vec<u8>> {
    let mut record = Record::new();
    Mappings::default().encode(value, &mut record)?;
    record.to_bytes()
}

/// Decode a fresh `T` from an archive produced by [`archive`], running any
/// migrations the archive predates.
///
/// ```
/// use netabase_mappings::prelude::*;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Counter {
///     hits: u64,
/// }
///
/// impl Mappable for Counter {
///     fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
///         mapper.bind(&mut self.hits, "hits")
///     }
/// }
///
/// let bytes = archive(&mut Counter { hits: 3 }).unwrap();
/// let back: Counter = unarchive(&bytes).unwrap();
/// assert_eq!(back, Counter { hits: 3 });
/// ```
pub fn unarchive<T: Mappable + Default>(bytes: &[u8]) -> MappingResult<T> {
    let record = Record::from_bytes(bytes)?;
    let mut value = T::default();
    Mappings::default().decode(&mut value, &record)?;
    Ok(value)
}
