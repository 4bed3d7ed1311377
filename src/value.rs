//! Stored value kinds and the [`Storable`] conversion trait.
//!
//! A keyed store understands a closed set of primitive kinds plus one opaque
//! reference category, [`StoredValue::Object`], which carries composite values
//! as bincode bytes. Every Rust type that can sit behind a key implements
//! [`Storable`] exactly once, so the engine never has to inspect a requested
//! type at runtime.
//!
//! ```
//! use netabase_mappings::{Storable, StoredValue, ValueKind};
//!
//! let stored = 42i64.to_stored().unwrap();
//! assert_eq!(stored, StoredValue::I64(42));
//! assert_eq!(stored.kind(), ValueKind::I64);
//!
//! // Asking for the wrong kind hands the value back untouched.
//! let back = f32::from_stored(stored.clone());
//! assert_eq!(back, Err(stored));
//! ```

use std::collections::{BTreeMap, HashMap};

use bincode::config::standard;
use derive_more::From;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants};

use crate::error::MappingResult;

#[derive(
    Debug,
    Clone,
    PartialEq,
    From,
    EnumDiscriminants,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
#[strum_discriminants(name(ValueKind), derive(Display, Hash))]
pub enum StoredValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    /// Opaque reference category for composite values, bincode encoded.
    Object(Vec<u8>),
}

impl StoredValue {
    pub fn kind(&self) -> ValueKind {
        self.into()
    }

    /// Interpret the value as a schema version marker.
    ///
    /// Any integer kind is accepted as long as it fits in a `u32`.
    pub fn as_version(&self) -> Option<u32> {
        match *self {
            StoredValue::I8(v) => u32::try_from(v).ok(),
            StoredValue::I16(v) => u32::try_from(v).ok(),
            StoredValue::I32(v) => u32::try_from(v).ok(),
            StoredValue::I64(v) => u32::try_from(v).ok(),
            StoredValue::U8(v) => Some(u32::from(v)),
            StoredValue::U16(v) => Some(u32::from(v)),
            StoredValue::U32(v) => Some(v),
            StoredValue::U64(v) => u32::try_from(v).ok(),
            _ => None,
        }
    }
}

/// A Rust type that can be written under a key and read back.
pub trait Storable: Sized + 'static {
    fn to_stored(&self) -> MappingResult<StoredValue>;

    /// Convert back from the stored form, returning the value unchanged when
    /// it holds a different kind.
    fn from_stored(value: StoredValue) -> Result<Self, StoredValue>;
}

macro_rules! impl_storable_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Storable for $ty {
                fn to_stored(&self) -> MappingResult<StoredValue> {
                    Ok(StoredValue::from(self.clone()))
                }

                fn from_stored(value: StoredValue) -> Result<Self, StoredValue> {
                    match value {
                        StoredValue::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_storable_primitive!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
);

/// Encode a composite value into the [`StoredValue::Object`] category.
pub fn encode_object<T: bincode::Encode>(value: &T) -> MappingResult<StoredValue> {
    Ok(bincode::encode_to_vec(value, standard())?.into())
}

/// Decode a composite value from the [`StoredValue::Object`] category.
///
/// Bytes that do not decode as `T`, or leave trailing input behind, count as
/// a kind mismatch and are handed back.
pub fn decode_object<T: bincode::Decode<()>>(value: StoredValue) -> Result<T, StoredValue> {
    match value {
        StoredValue::Object(bytes) => match bincode::decode_from_slice::<T, _>(&bytes, standard())
        {
            Ok((decoded, read)) if read == bytes.len() => Ok(decoded),
            _ => Err(StoredValue::Object(bytes)),
        },
        other => Err(other),
    }
}

impl<T> Storable for Vec<T>
where
    Vec<T>: bincode::Encode + bincode::Decode<()>,
    T: 'static,
{
    fn to_stored(&self) -> MappingResult<StoredValue> {
        encode_object(self)
    }

    fn from_stored(value: StoredValue) -> Result<Self, StoredValue> {
        decode_object(value)
    }
}

impl<K, V> Storable for BTreeMap<K, V>
where
    BTreeMap<K, V>: bincode::Encode + bincode::Decode<()>,
    K: 'static,
    V: 'static,
{
    fn to_stored(&self) -> MappingResult<StoredValue> {
        encode_object(self)
    }

    fn from_stored(value: StoredValue) -> Result<Self, StoredValue> {
        decode_object(value)
    }
}

impl<K, V> Storable for HashMap<K, V>
where
    HashMap<K, V>: bincode::Encode + bincode::Decode<()>,
    K: 'static,
    V: 'static,
{
    fn to_stored(&self) -> MappingResult<StoredValue> {
        encode_object(self)
    }

    fn from_stored(value: StoredValue) -> Result<Self, StoredValue> {
        decode_object(value)
    }
}

/// Implement [`Storable`] for composite types through the object category.
///
/// The types must implement `bincode::Encode` and `bincode::Decode<()>`.
///
/// ```
/// use netabase_mappings::{storable_object, Storable, ValueKind};
///
/// #[derive(Debug, PartialEq, bincode::Encode, bincode::Decode)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// storable_object!(Point);
///
/// let stored = Point { x: 1, y: 2 }.to_stored().unwrap();
/// assert_eq!(stored.kind(), ValueKind::Object);
/// assert_eq!(Point::from_stored(stored), Ok(Point { x: 1, y: 2 }));
/// ```
#[macro_export]
macro_rules! storable_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Storable for $ty {
                fn to_stored(&self) -> $crate::MappingResult<$crate::StoredValue> {
                    $crate::value::encode_object(self)
                }

                fn from_stored(
                    value: $crate::StoredValue,
                ) -> ::core::result::Result<Self, $crate::StoredValue> {
                    $crate::value::decode_object(value)
                }
            }
        )+
    };
}
