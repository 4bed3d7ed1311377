//! Lazy, chainable value accessors.
//!
//! A [`Getter`] is either *bound* to a key of the [`Reader`] it was created
//! over and not yet read, or *ready*: a producer plus an ordered chain of type-erased
//! transforms applied left to right on every access. A bound getter never
//! carries transforms; appending one first captures the store read as the
//! producer, so keys nobody transforms are never read before a field asks
//! for them.

use std::any::{Any, type_name};
use std::fmt;

use log::trace;

use crate::error::{MappingError, MappingResult};
use crate::traits::store::{ReadExt, Reader};
use crate::value::Storable;

/// A boxed value whose concrete type is only known where it was produced.
pub(crate) struct Erased {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Erased {
    fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    fn downcast<T: 'static>(self, key: &str) -> MappingResult<T> {
        let found = self.type_name;
        self.value
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| MappingError::mismatch(key, type_name::<T>(), found))
    }
}

type Producer<'r> = Box<dyn Fn() -> MappingResult<Option<Erased>> + 'r>;
type Transform<'r> = Box<dyn Fn(Option<Erased>) -> MappingResult<Option<Erased>> + 'r>;

enum Source<'r> {
    Bound {
        key: String,
        reader: &'r dyn Reader,
    },
    Ready {
        key: String,
        producer: Producer<'r>,
        transforms: Vec<Transform<'r>>,
    },
}

pub struct Getter<'r> {
    source: Source<'r>,
}

impl<'r> Getter<'r> {
    /// A getter that reads `key` from `reader` when materialized.
    pub fn bound(reader: &'r dyn Reader, key: impl Into<String>) -> Self {
        Self {
            source: Source::Bound {
                key: key.into(),
                reader,
            },
        }
    }

    /// A getter that always produces a clone of `value`.
    pub fn constant<V: Clone + 'static>(key: impl Into<String>, value: V) -> Self {
        Self {
            source: Source::Ready {
                key: key.into(),
                producer: Box::new(move || Ok(Some(Erased::new(value.clone())))),
                transforms: Vec::new(),
            },
        }
    }

    /// The store key this getter originates from.
    pub fn source_key(&self) -> &str {
        match &self.source {
            Source::Bound { key, .. } | Source::Ready { key, .. } => key,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.source, Source::Bound { .. })
    }

    pub fn transform_count(&self) -> usize {
        match &self.source {
            Source::Bound { .. } => 0,
            Source::Ready { transforms, .. } => transforms.len(),
        }
    }

    /// Produce the value as `T`.
    ///
    /// Bound getters read their key; ready getters run their producer and
    /// fold the transform chain over the result.
    pub fn materialize<T: Storable>(&self) -> MappingResult<Option<T>> {
        match &self.source {
            Source::Bound { key, reader } => {
                trace!("materializing bound key '{}' as {}", key, type_name::<T>());
                reader.read::<T>(key)
            }
            Source::Ready {
                key,
                producer,
                transforms,
            } => {
                trace!(
                    "materializing '{}' as {} through {} transform(s)",
                    key,
                    type_name::<T>(),
                    transforms.len()
                );
                let mut running = producer()?;
                for transform in transforms {
                    running = transform(running)?;
                }
                running.map(|erased| erased.downcast::<T>(key)).transpose()
            }
        }
    }

    /// Append a transform from `From` to `To`.
    ///
    /// A bound getter becomes ready first, with a producer that reads its key
    /// as `From`. The transform sees absence explicitly and may produce or
    /// drop a value.
    pub fn then<From, To, F>(self, transform: F) -> Self
    where
        From: Storable,
        To: 'static,
        F: Fn(Option<From>) -> Option<To> + 'r,
    {
        let (key, producer, mut transforms) = match self.source {
            Source::Bound { key, reader } => {
                let source_key = key.clone();
                let producer: Producer<'r> = Box::new(move || {
                    Ok(reader.read::<From>(&source_key)?.map(Erased::new))
                });
                (key, producer, Vec::new())
            }
            Source::Ready {
                key,
                producer,
                transforms,
            } => (key, producer, transforms),
        };

        let input_key = key.clone();
        transforms.push(Box::new(move |running: Option<Erased>| {
            let input = running
                .map(|erased| erased.downcast::<From>(&input_key))
                .transpose()?;
            Ok(transform(input).map(Erased::new))
        }));

        Self {
            source: Source::Ready {
                key,
                producer,
                transforms,
            },
        }
    }
}

impl fmt::Debug for Getter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Bound { key, .. } => f.debug_struct("Bound").field("key", key).finish(),
            Source::Ready {
                key, transforms, ..
            } => f
                .debug_struct("Ready")
                .field("key", key)
                .field("transforms", &transforms.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::traits::store::{EmptyReader, WriteExt};

    #[test]
    fn bound_getter_reads_its_key() {
        let mut record = Record::new();
        record.write("y", &3i64).unwrap();

        let getter = Getter::bound(&record, "y");
        assert!(getter.is_bound());
        assert_eq!(getter.materialize::<i64>().unwrap(), Some(3));
        assert_eq!(Getter::bound(&record, "nope").materialize::<i64>().unwrap(), None);
    }

    #[test]
    fn constant_getter_ignores_the_store() {
        let getter = Getter::constant("y", 7.2f32);
        assert!(!getter.is_bound());
        assert_eq!(getter.transform_count(), 0);
        assert_eq!(getter.materialize::<f32>().unwrap(), Some(7.2));
        // every access re-runs the producer
        assert_eq!(getter.materialize::<f32>().unwrap(), Some(7.2));
    }

    #[test]
    fn transforms_apply_left_to_right() {
        let getter = Getter::constant("n", 2i64)
            .then(|v: Option<i64>| v.map(|n| n + 1))
            .then(|v: Option<i64>| v.map(|n| n * 10))
            .then(|v: Option<i64>| v.map(|n| n.to_string()));

        assert_eq!(getter.transform_count(), 3);
        assert_eq!(getter.materialize::<String>().unwrap().as_deref(), Some("30"));
    }

    #[test]
    fn transforming_a_bound_getter_reads_the_original_key() {
        let mut record = Record::new();
        record.write("celsius", &20.0f64).unwrap();

        let getter =
            Getter::bound(&record, "celsius").then(|c: Option<f64>| c.map(|c| c * 1.8 + 32.0));
        assert!(!getter.is_bound());
        assert_eq!(getter.source_key(), "celsius");
        assert_eq!(getter.materialize::<f64>().unwrap(), Some(68.0));
    }

    #[test]
    fn transforms_can_synthesize_missing_values() {
        let getter = Getter::bound(&EmptyReader, "absent").then(|v: Option<u32>| Some(v.unwrap_or(9)));
        assert_eq!(getter.materialize::<u32>().unwrap(), Some(9));
    }

    #[test]
    fn transform_with_wrong_input_type_is_a_mismatch() {
        let getter = Getter::constant("y", 7.2f32).then(|v: Option<String>| v);

        match getter.materialize::<String>().unwrap_err() {
            MappingError::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "y");
                assert_eq!(expected, type_name::<String>());
                assert_eq!(found, "f32");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn materializing_as_wrong_type_is_a_mismatch() {
        let getter = Getter::constant("y", 1u8);
        assert!(matches!(
            getter.materialize::<i64>(),
            Err(MappingError::TypeMismatch { .. })
        ));
    }
}
