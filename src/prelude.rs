//! Prelude module for convenient imports.
//!
//! ```rust
//! use netabase_mappings::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - [`Mappable`], [`MigrationStep`]: what a mapped type implements
//! - [`Mapper`], [`Migrator`]: what mapping declarations and migration steps receive
//! - [`encode`], [`decode`], [`Mappings`]: versioned entry points
//! - [`Record`], [`archive`], [`unarchive`]: the in-memory store and its byte form
//! - [`Reader`], [`Writer`], [`ReadExt`], [`WriteExt`]: the storage capability
//! - [`MappingError`], [`MappingResult`]

pub use crate::config::MappingsConfig;
pub use crate::error::{MappingError, MappingResult};
pub use crate::mapper::Mapper;
pub use crate::mappings::{Mappings, archived_version, decode, encode};
pub use crate::migration::Migrator;
pub use crate::record::{Record, archive, unarchive};
pub use crate::traits::{Mappable, MigrationStep, ReadExt, Reader, WriteExt, Writer};
pub use crate::value::{Storable, StoredValue};

#[cfg(feature = "derive")]
pub use netabase_mappings_macros::Mappable;
