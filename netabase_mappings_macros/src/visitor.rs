use std::collections::HashSet;

use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Expr, Field, Fields, GenericArgument, Ident, LitStr, PathArguments, Result,
    Type,
};

use crate::errors;

const VERSION_KEY: &str = "__mappings_ver";

/// How a field is bound
#[derive(Debug, Clone)]
pub enum FieldBinding {
    Required,
    Optional,
}

/// Information collected about a mapped field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: Ident,
    pub key: LitStr,
    pub binding: FieldBinding,
}

/// Information collected about a struct deriving `Mappable`
#[derive(Debug, Clone)]
pub struct MappableVisitor {
    pub migrations: Option<Expr>,
    pub fields: Vec<FieldInfo>,
}

impl MappableVisitor {
    pub fn from_derive_input(input: &DeriveInput) -> Result<Self> {
        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unnamed(_) => {
                    return Err(errors::unsupported_shape(input.ident.span(), "tuple struct"));
                }
                Fields::Unit => {
                    return Err(errors::unsupported_shape(input.ident.span(), "unit struct"));
                }
            },
            Data::Enum(_) => return Err(errors::unsupported_shape(input.ident.span(), "enum")),
            Data::Union(_) => return Err(errors::unsupported_shape(input.ident.span(), "union")),
        };

        let mut visitor = Self {
            migrations: Self::visit_struct_attributes(input)?,
            fields: Vec::new(),
        };

        let mut seen = HashSet::new();
        for field in &named.named {
            if let Some(info) = visitor.visit_field(field)? {
                let key = info.key.value();
                if key == VERSION_KEY {
                    return Err(errors::reserved_key(info.key.span(), &key));
                }
                if !seen.insert(key.clone()) {
                    return Err(errors::duplicate_key(info.key.span(), &key));
                }
                visitor.fields.push(info);
            }
        }

        Ok(visitor)
    }

    fn visit_struct_attributes(input: &DeriveInput) -> Result<Option<Expr>> {
        let mut migrations = None;
        for attr in input.attrs.iter().filter(|a| a.path().is_ident("mappings")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("migrations") {
                    migrations = Some(meta.value()?.parse::<Expr>()?);
                    Ok(())
                } else {
                    let name = meta
                        .path
                        .get_ident()
                        .map(Ident::to_string)
                        .unwrap_or_default();
                    Err(errors::unknown_attribute(meta.path.span(), &name, "migrations"))
                }
            })?;
        }
        Ok(migrations)
    }

    /// Visit a field and collect its information, `None` if skipped
    fn visit_field(&self, field: &Field) -> Result<Option<FieldInfo>> {
        let name = field
            .ident
            .clone()
            .ok_or_else(|| errors::unsupported_shape(proc_macro2::Span::call_site(), "unnamed field"))?;

        let mut key = None;
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("mapping")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    key = Some(meta.value()?.parse::<LitStr>()?);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    let attr_name = meta
                        .path
                        .get_ident()
                        .map(Ident::to_string)
                        .unwrap_or_default();
                    Err(errors::unknown_attribute(meta.path.span(), &attr_name, "key, skip"))
                }
            })?;
        }

        if skip {
            return Ok(None);
        }

        let key = key.unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));
        let binding = if option_inner(&field.ty).is_some() {
            FieldBinding::Optional
        } else {
            FieldBinding::Required
        };

        Ok(Some(FieldInfo { name, key, binding }))
    }
}

/// The `T` of an `Option<T>` field type, matched syntactically.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}
