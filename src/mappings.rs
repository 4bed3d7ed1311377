//! Versioned encode and decode entry points.
//!
//! Encoding writes the schema version under a reserved key (only when the
//! type has migrations) and then every field. Decoding reads that version,
//! refuses payloads newer than the code, runs the migrations the payload is
//! missing, and only then binds fields.

use std::any::type_name;

use log::{debug, trace};

use crate::config::MappingsConfig;
use crate::error::{MappingError, MappingResult};
use crate::mapper::Mapper;
use crate::migration::Migrator;
use crate::traits::mappable::Mappable;
use crate::traits::store::{EmptyReader, Reader, Writer};

/// Reserved key for the schema version marker.
pub const VERSION_KEY: &str = "__mappings_ver";

#[derive(Debug, Clone, Default)]
pub struct Mappings {
    config: MappingsConfig,
}

impl Mappings {
    pub fn new(config: MappingsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MappingsConfig {
        &self.config
    }

    /// The schema version recorded in `reader`, or 0 without a marker.
    pub fn archived_version(&self, reader: &dyn Reader) -> MappingResult<u32> {
        let key = &self.config.version_key;
        match reader.read_value(key)? {
            None => Ok(0),
            Some(stored) => stored.as_version().ok_or_else(|| {
                MappingError::mismatch(key.as_str(), "schema version", stored.kind().to_string())
            }),
        }
    }

    /// Run the whole migration history of `T` against an empty store.
    ///
    /// Getters are lazy, so this only exercises the structure of each step
    /// and reports operations such as renaming a key to itself.
    pub fn validate<T: Mappable>(&self) -> MappingResult<()> {
        let mut migrator = Migrator::new(&EmptyReader);
        for (version, step) in T::MIGRATIONS.iter().enumerate() {
            trace!("validating {} migration {}", type_name::<T>(), version);
            step(&mut migrator)?;
        }
        Ok(())
    }

    /// Populate `value` from `reader`.
    ///
    /// Fails with [`MappingError::NewerVersion`] before touching `value` when
    /// the payload was written by a newer schema.
    pub fn decode<T: Mappable>(&self, value: &mut T, reader: &dyn Reader) -> MappingResult<()> {
        let archived = self.archived_version(reader)?;
        let current = T::mapping_version();
        debug!(
            "decoding {} (archived version {}, current version {})",
            type_name::<T>(),
            archived,
            current
        );

        if archived > current {
            return Err(MappingError::NewerVersion {
                type_name: type_name::<T>(),
                archived_version: archived,
                current_version: current,
            });
        }

        if self.config.validate_migrations {
            self.validate::<T>()?;
        }

        let mut migrator = Migrator::new(reader);
        let pending = &T::MIGRATIONS[archived as usize..current as usize];
        for (offset, step) in pending.iter().enumerate() {
            trace!(
                "applying {} migration {}",
                type_name::<T>(),
                archived as usize + offset
            );
            step(&mut migrator)?;
        }

        let mut mapper = Mapper::migrated(migrator).with_version_key(&self.config.version_key);
        value.map_with(&mut mapper)
    }

    /// Write `value` to `writer`.
    ///
    /// The mapping declaration is shared with decoding, hence `&mut`; no field
    /// is modified. Only object encoding can fail.
    pub fn encode<T: Mappable>(&self, value: &mut T, writer: &mut dyn Writer) -> MappingResult<()> {
        let current = T::mapping_version();
        debug!("encoding {} at version {}", type_name::<T>(), current);

        if current > 0 || self.config.always_write_version {
            writer.write_value(&self.config.version_key, current.into());
        }

        let mut mapper = Mapper::encoding(writer).with_version_key(&self.config.version_key);
        value.map_with(&mut mapper)
    }
}

/// [`Mappings::decode`] with the default configuration.
pub fn decode<T: Mappable>(value: &mut T, reader: &dyn Reader) -> MappingResult<()> {
    Mappings::default().decode(value, reader)
}

/// [`Mappings::encode`] with the default configuration.
pub fn encode<T: Mappable>(value: &mut T, writer: &mut dyn Writer) -> MappingResult<()> {
    Mappings::default().encode(value, writer)
}

/// [`Mappings::archived_version`] with the default configuration.
pub fn archived_version(reader: &dyn Reader) -> MappingResult<u32> {
    Mappings::default().archived_version(reader)
}
