use proc_macro2::Span;
use syn::Error;

/// Utilities for generating consistent error messages

pub fn unsupported_shape(span: Span, detail: &str) -> Error {
    Error::new(
        span,
        format!("Mappable can only be derived for structs with named fields: {}", detail),
    )
}

pub fn unknown_attribute(span: Span, attr_name: &str, allowed: &str) -> Error {
    Error::new(
        span,
        format!(
            "Unknown attribute '{}'. Expected one of: {}",
            attr_name, allowed
        ),
    )
}

pub fn duplicate_key(span: Span, key: &str) -> Error {
    Error::new(
        span,
        format!(
            "Duplicate mapping key '{}'. Each field must map to its own key",
            key
        ),
    )
}

pub fn reserved_key(span: Span, key: &str) -> Error {
    Error::new(
        span,
        format!(
            "Mapping key '{}' is reserved for the schema version marker",
            key
        ),
    )
}
