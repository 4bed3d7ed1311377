use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod errors;
mod generate;
mod visitor;

/// Derives `netabase_mappings::Mappable` for a struct with named fields.
///
/// Every field is bound under a key equal to its name, in declaration order.
/// Fields whose type is `Option<T>` are bound as optional: `None` is omitted
/// when encoding and a missing key decodes as `None`.
///
/// # Attributes
///
/// - `#[mappings(migrations = PATH)]` - **Optional**, on the struct. A const
///   `&'static [MigrationStep]` holding the migration history, oldest first
/// - `#[mapping(key = "name")]` - **Optional**, on a field. Stores the field
///   under a different key
/// - `#[mapping(skip)]` - **Optional**, on a field. Leaves the field out of
///   the mapping entirely; it keeps whatever value it had before decoding
///
/// # Examples
///
/// ```
/// use netabase_mappings::prelude::*;
///
/// fn v1(m: &mut Migrator<'_>) -> MappingResult<()> {
///     m.rename("y", "z")?;
///     m.add_value("y", 7.2f32);
///     Ok(())
/// }
///
/// const B_MIGRATIONS: &[MigrationStep] = &[v1];
///
/// #[derive(Mappable, Default)]
/// #[mappings(migrations = B_MIGRATIONS)]
/// struct B {
///     x: i64,
///     y: Option<f32>,
///     #[mapping(key = "z")]
///     tags: Vec<String>,
///     #[mapping(skip)]
///     cached_len: usize,
/// }
///
/// assert_eq!(B::mapping_version(), 1);
/// ```
#[proc_macro_derive(Mappable, attributes(mapping, mappings))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    visitor::MappableVisitor::from_derive_input(&input)
        .map(|visitor| generate::mappable_impl(&input, &visitor))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
