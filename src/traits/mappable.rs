//! The trait a value implements to be mapped onto a keyed store.

use crate::error::MappingResult;
use crate::mapper::Mapper;
use crate::migration::Migrator;

/// One increment of schema evolution.
///
/// A step rewrites the accessor set of a single decode: it may rename keys,
/// inject constants or append transforms. Steps run in declaration order and
/// each sees the cumulative effect of the ones before it.
pub type MigrationStep = for<'r> fn(&mut Migrator<'r>) -> MappingResult<()>;

/// A structured value with a bidirectional field mapping and an ordered
/// migration history.
///
/// The current schema version of a type is the length of
/// [`Mappable::MIGRATIONS`]. The same [`Mappable::map_with`] declaration is
/// used for both encoding and decoding.
///
/// # Example
///
/// ```
/// use netabase_mappings::prelude::*;
///
/// #[derive(Default)]
/// struct Post {
///     title: String,
///     views: u64,
///     subtitle: Option<String>,
/// }
///
/// fn split_counter(m: &mut Migrator<'_>) -> MappingResult<()> {
///     m.rename("count", "views")
/// }
///
/// impl Mappable for Post {
///     const MIGRATIONS: &'static [MigrationStep] = &[split_counter];
///
///     fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
///         mapper.bind(&mut self.title, "title")?;
///         mapper.bind(&mut self.views, "views")?;
///         mapper.bind_optional(&mut self.subtitle, "subtitle")
///     }
/// }
///
/// assert_eq!(Post::mapping_version(), 1);
/// ```
pub trait Mappable {
    /// Migration history, oldest first.
    const MIGRATIONS: &'static [MigrationStep] = &[];

    /// Bind every logical field to its key, once each, in a stable order.
    fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()>;

    /// `MIGRATIONS.len()`
    fn mapping_version() -> u32
    where
        Self: Sized,
    {
        Self::MIGRATIONS.len() as u32
    }
}
