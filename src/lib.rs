//! # Netabase Mappings
//!
//! Declare once how a value's fields map onto the named slots of a keyed
//! store, and separately declare the ordered migrations that turn an older
//! slot layout into the current one before the mapping runs.
//!
//! ## Features
//!
//! - **Symmetric**: One mapping declaration drives both encode and decode
//! - **Versioned**: The schema version is the number of declared migrations,
//!   stored under a single reserved key
//! - **Lazy Migration**: Renames, injected constants and type transforms are
//!   chained per key and only evaluated when a field asks for them
//! - **Typed Errors**: Newer payloads, missing fields, kind mismatches and
//!   invalid migrations are all recoverable errors
//! - **Pluggable Storage**: Anything implementing [`Reader`]/[`Writer`];
//!   an in-memory [`Record`] and a sled backend are included
//!
//! ## Quick Start
//!
//! ```rust
//! use netabase_mappings::prelude::*;
//!
//! // Version 0 stored `x` and a list under `y`.
//! #[derive(Default)]
//! struct A {
//!     x: i64,
//!     y: Vec<String>,
//! }
//!
//! impl Mappable for A {
//!     fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
//!         mapper.bind(&mut self.x, "x")?;
//!         mapper.bind(&mut self.y, "y")
//!     }
//! }
//!
//! // Version 1 moved the list to `z` and introduced a float `y`.
//! fn move_list(m: &mut Migrator<'_>) -> MappingResult<()> {
//!     m.rename("y", "z")?;
//!     m.add_value("y", 7.2f32);
//!     Ok(())
//! }
//!
//! #[derive(Default)]
//! struct B {
//!     x: i64,
//!     y: Option<f32>,
//!     z: Vec<String>,
//! }
//!
//! impl Mappable for B {
//!     const MIGRATIONS: &'static [MigrationStep] = &[move_list];
//!
//!     fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
//!         mapper.bind(&mut self.x, "x")?;
//!         mapper.bind_optional(&mut self.y, "y")?;
//!         mapper.bind(&mut self.z, "z")
//!     }
//! }
//!
//! let mut record = Record::new();
//! encode(&mut A { x: 5, y: vec!["aoeu".into(), ";qjkx".into()] }, &mut record)?;
//!
//! let mut b = B::default();
//! decode(&mut b, &record)?;
//! assert_eq!(b.x, 5);
//! assert_eq!(b.y, Some(7.2));
//! assert_eq!(b.z, vec!["aoeu".to_string(), ";qjkx".to_string()]);
//! # Ok::<(), netabase_mappings::MappingError>(())
//! ```

extern crate self as netabase_mappings;

pub mod config;
pub mod databases;
pub mod error;
pub mod mapper;
pub mod mappings;
pub mod migration;
pub mod prelude;
pub mod record;
pub mod traits;
pub mod value;

pub use config::{MappingsConfig, StoreConfig};
pub use error::{MappingError, MappingResult};
pub use mapper::Mapper;
pub use mappings::{Mappings, VERSION_KEY, archived_version, decode, encode};
pub use migration::{Getter, Migrator};
pub use record::{Record, archive, unarchive};
pub use traits::{EmptyReader, Mappable, MigrationStep, ReadExt, Reader, WriteExt, Writer};
pub use value::{Storable, StoredValue, ValueKind};

#[cfg(feature = "derive")]
pub use netabase_mappings_macros::Mappable;
