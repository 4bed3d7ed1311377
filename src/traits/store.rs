//! Storage capability consumed by the mapping engine.
//!
//! The engine never decides how bytes are laid out. It only needs something
//! that can hand back the [`StoredValue`] under a key ([`Reader`]) and
//! something that can accept one ([`Writer`]). Both traits are object safe so
//! migration steps can be plain function pointers over `&dyn Reader`.
//!
//! Typed access goes through the blanket [`ReadExt`] and [`WriteExt`]
//! extensions, which convert through [`Storable`] and turn a kind mismatch
//! into [`MappingError::TypeMismatch`].

use std::any::type_name;

use crate::error::{MappingError, MappingResult};
use crate::value::{Storable, StoredValue};

pub trait Reader {
    /// Fetch the raw value under `key`, or `None` if the key is not present.
    fn read_value(&self, key: &str) -> MappingResult<Option<StoredValue>>;

    fn contains_key(&self, key: &str) -> MappingResult<bool> {
        Ok(self.read_value(key)?.is_some())
    }
}

pub trait Writer {
    /// Persist `value` under `key`, replacing whatever was there.
    fn write_value(&mut self, key: &str, value: StoredValue);
}

impl<R: Reader + ?Sized> Reader for &R {
    fn read_value(&self, key: &str) -> MappingResult<Option<StoredValue>> {
        (**self).read_value(key)
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write_value(&mut self, key: &str, value: StoredValue) {
        (**self).write_value(key, value)
    }
}

pub trait ReadExt: Reader {
    /// Read `key` as `T`.
    ///
    /// Returns `Ok(None)` when the key is absent and
    /// [`MappingError::TypeMismatch`] when it holds a different kind.
    fn read<T: Storable>(&self, key: &str) -> MappingResult<Option<T>> {
        match self.read_value(key)? {
            None => Ok(None),
            Some(stored) => T::from_stored(stored).map(Some).map_err(|found| {
                MappingError::mismatch(key, type_name::<T>(), found.kind().to_string())
            }),
        }
    }
}

impl<R: Reader + ?Sized> ReadExt for R {}

pub trait WriteExt: Writer {
    fn write<T: Storable>(&mut self, key: &str, value: &T) -> MappingResult<()> {
        let stored = value.to_stored()?;
        self.write_value(key, stored);
        Ok(())
    }
}

impl<W: Writer + ?Sized> WriteExt for W {}

/// A reader with no keys at all.
///
/// Used to dry-run migration histories before any real data is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyReader;

impl Reader for EmptyReader {
    fn read_value(&self, _key: &str) -> MappingResult<Option<StoredValue>> {
        Ok(None)
    }
}
