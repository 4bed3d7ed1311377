//! The per-field adapter a mapping declaration talks to.

use std::any::type_name;
use std::collections::HashMap;

use log::trace;

use crate::error::{MappingError, MappingResult};
use crate::mappings::VERSION_KEY;
use crate::migration::{Getter, Migrator};
use crate::traits::store::{ReadExt, Reader, WriteExt, Writer};
use crate::value::Storable;

enum State<'a> {
    Encoding(&'a mut dyn Writer),
    Decoding {
        reader: &'a dyn Reader,
        values: HashMap<String, Getter<'a>>,
    },
}

/// Binds fields to keys in one direction, chosen at construction.
///
/// In encoding mode every `bind` writes straight to the writer. In decoding
/// mode `bind` first looks for a migration override for the key and falls
/// back to a plain read from the store.
///
/// The schema version key is reserved in both modes: binding a field to it
/// fails with [`MappingError::ReservedKey`].
pub struct Mapper<'a> {
    state: State<'a>,
    version_key: String,
}

impl<'a> Mapper<'a> {
    pub fn encoding(writer: &'a mut dyn Writer) -> Self {
        Self {
            state: State::Encoding(writer),
            version_key: VERSION_KEY.to_owned(),
        }
    }

    /// A decoding mapper with no migration overrides.
    pub fn decoding(reader: &'a dyn Reader) -> Self {
        Self {
            state: State::Decoding {
                reader,
                values: HashMap::new(),
            },
            version_key: VERSION_KEY.to_owned(),
        }
    }

    /// A decoding mapper over the final accessor set of `migrator`.
    pub fn migrated(migrator: Migrator<'a>) -> Self {
        let reader = migrator.reader();
        Self {
            state: State::Decoding {
                reader,
                values: migrator.into_values(),
            },
            version_key: VERSION_KEY.to_owned(),
        }
    }

    /// Reserve `key` instead of the default version key.
    pub fn with_version_key(mut self, key: impl Into<String>) -> Self {
        self.version_key = key.into();
        self
    }

    pub fn version_key(&self) -> &str {
        &self.version_key
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self.state, State::Encoding(_))
    }

    pub fn is_decoding(&self) -> bool {
        !self.is_encoding()
    }

    /// Bind a required field.
    ///
    /// Decoding fails with [`MappingError::MissingField`] when neither a
    /// migration override nor the store has a value for `key`.
    pub fn bind<T: Storable>(&mut self, value: &mut T, key: &str) -> MappingResult<()> {
        self.check_key(key)?;
        match &mut self.state {
            State::Encoding(writer) => writer.write(key, &*value),
            State::Decoding { reader, values } => match resolve::<T>(*reader, values, key)? {
                Some(v) => {
                    *value = v;
                    Ok(())
                }
                None => Err(MappingError::MissingField {
                    key: key.to_owned(),
                    type_name: type_name::<T>(),
                }),
            },
        }
    }

    /// Bind an optional field.
    ///
    /// `None` is omitted when encoding; a missing key decodes as `None`.
    pub fn bind_optional<T: Storable>(
        &mut self,
        value: &mut Option<T>,
        key: &str,
    ) -> MappingResult<()> {
        self.check_key(key)?;
        match &mut self.state {
            State::Encoding(writer) => match value {
                Some(v) => writer.write(key, &*v),
                None => Ok(()),
            },
            State::Decoding { reader, values } => {
                *value = resolve::<T>(*reader, values, key)?;
                Ok(())
            }
        }
    }

    fn check_key(&self, key: &str) -> MappingResult<()> {
        if key == self.version_key {
            return Err(MappingError::ReservedKey {
                key: key.to_owned(),
            });
        }
        Ok(())
    }
}

fn resolve<T: Storable>(
    reader: &dyn Reader,
    values: &HashMap<String, Getter<'_>>,
    key: &str,
) -> MappingResult<Option<T>> {
    match values.get(key) {
        Some(getter) => {
            trace!("key '{}' resolved through migration", key);
            getter.materialize::<T>()
        }
        None => reader.read::<T>(key),
    }
}
