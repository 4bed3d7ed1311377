//! Schema migration for a single decode.
//!
//! Migration steps never see the stored data directly. They rewrite a set of
//! named [`Getter`]s owned by a [`Migrator`]: renaming a key moves its getter,
//! adding a value installs a constant, and transforming appends a function to
//! the getter's chain. Nothing is read from the store until a field is bound.
//!
//! # Example
//!
//! ```
//! use netabase_mappings::prelude::*;
//!
//! // v1 renamed `y` to `z` and introduced a float `y`
//! fn v1(m: &mut Migrator<'_>) -> MappingResult<()> {
//!     m.rename("y", "z")?;
//!     m.add_value("y", 7.2f32);
//!     Ok(())
//! }
//!
//! // v2 stores `y` as an integer
//! fn v2(m: &mut Migrator<'_>) -> MappingResult<()> {
//!     m.transform("y", |y: f32| y as i64);
//!     Ok(())
//! }
//!
//! let record = Record::new();
//! let mut m = Migrator::new(&record);
//! v1(&mut m).unwrap();
//! v2(&mut m).unwrap();
//!
//! let y = m.get("y").unwrap().materialize::<i64>().unwrap();
//! assert_eq!(y, Some(7));
//! assert!(m.get("z").unwrap().is_bound());
//! ```

mod getter;
mod migrator;

pub use getter::Getter;
pub use migrator::Migrator;
