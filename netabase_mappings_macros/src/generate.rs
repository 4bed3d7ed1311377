use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::visitor::{FieldBinding, FieldInfo, MappableVisitor};

/// Generate the `Mappable` implementation for a visited struct
pub fn mappable_impl(input: &DeriveInput, visitor: &MappableVisitor) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let migrations = visitor.migrations.as_ref().map(|expr| {
        quote! {
            const MIGRATIONS: &'static [::netabase_mappings::MigrationStep] = #expr;
        }
    });
    let bindings = visitor.fields.iter().map(field_binding);

    quote! {
        impl #impl_generics ::netabase_mappings::Mappable for #name #ty_generics #where_clause {
            #migrations

            fn map_with(
                &mut self,
                mapper: &mut ::netabase_mappings::Mapper<'_>,
            ) -> ::netabase_mappings::MappingResult<()> {
                #(#bindings)*
                ::std::result::Result::Ok(())
            }
        }
    }
}

fn field_binding(field: &FieldInfo) -> TokenStream {
    let FieldInfo { name, key, binding } = field;
    match binding {
        FieldBinding::Required => quote! { mapper.bind(&mut self.#name, #key)?; },
        FieldBinding::Optional => quote! { mapper.bind_optional(&mut self.#name, #key)?; },
    }
}
