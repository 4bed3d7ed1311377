use std::collections::HashMap;

use log::trace;

use crate::error::{MappingError, MappingResult};
use crate::migration::getter::Getter;
use crate::traits::store::Reader;
use crate::value::Storable;

/// Owns the accessor set of one decode while migration steps rewrite it.
///
/// Keys without an entry fall through to the reader when fields are bound.
/// A migrator is created fresh for each decode and consumed by the
/// [`Mapper`](crate::Mapper) that follows.
pub struct Migrator<'r> {
    reader: &'r dyn Reader,
    values: HashMap<String, Getter<'r>>,
}

impl<'r> Migrator<'r> {
    pub fn new(reader: &'r dyn Reader) -> Self {
        Self {
            reader,
            values: HashMap::new(),
        }
    }

    pub fn reader(&self) -> &'r dyn Reader {
        self.reader
    }

    /// Install `value` under `key`, overwriting any previous accessor.
    pub fn add_value<V: Clone + 'static>(&mut self, key: &str, value: V) {
        trace!("migrator: add value for '{}'", key);
        self.values
            .insert(key.to_owned(), Getter::constant(key, value));
    }

    /// Move the accessor for `key` to `to_key` without reading it.
    pub fn rename(&mut self, key: &str, to_key: &str) -> MappingResult<()> {
        if key == to_key {
            return Err(MappingError::InvalidMigration {
                key: key.to_owned(),
                reason: format!("cannot migrate key '{key}' to itself"),
            });
        }
        trace!("migrator: rename '{}' -> '{}'", key, to_key);
        let getter = self.take(key);
        self.values.insert(to_key.to_owned(), getter);
        Ok(())
    }

    /// Transform the value under `key` in place.
    ///
    /// Absent values stay absent and `transform` is not called for them.
    pub fn transform<From, To, F>(&mut self, key: &str, transform: F)
    where
        From: Storable,
        To: 'static,
        F: Fn(From) -> To + 'r,
    {
        self.transform_optional(key, None, move |v: Option<From>| v.map(&transform));
    }

    /// Transform the value under `key` and store it under `to_key`.
    pub fn transform_to<From, To, F>(&mut self, key: &str, to_key: &str, transform: F)
    where
        From: Storable,
        To: 'static,
        F: Fn(From) -> To + 'r,
    {
        self.transform_optional(key, Some(to_key), move |v: Option<From>| {
            v.map(&transform)
        });
    }

    /// The general form: `transform` sees absence and may produce or drop a
    /// value. `to_key` defaults to `key`.
    pub fn transform_optional<From, To, F>(&mut self, key: &str, to_key: Option<&str>, transform: F)
    where
        From: Storable,
        To: 'static,
        F: Fn(Option<From>) -> Option<To> + 'r,
    {
        let to_key = to_key.unwrap_or(key);
        trace!("migrator: transform '{}' -> '{}'", key, to_key);
        let getter = self.take(key).then(transform);
        self.values.insert(to_key.to_owned(), getter);
    }

    /// Drop any accessor for `key`, so binding it reads the store again.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Getter<'r>> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn into_values(self) -> HashMap<String, Getter<'r>> {
        self.values
    }

    fn take(&mut self, key: &str) -> Getter<'r> {
        self.values
            .remove(key)
            .unwrap_or_else(|| Getter::bound(self.reader, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::traits::store::{EmptyReader, WriteExt};

    fn archive() -> Record {
        let mut record = Record::new();
        record.write("x", &5i64).unwrap();
        record
            .write("y", &vec!["aoeu".to_string(), ";qjkx".to_string()])
            .unwrap();
        record
    }

    #[test]
    fn rename_to_itself_is_rejected() {
        let mut m = Migrator::new(&EmptyReader);
        let err = m.rename("y", "y").unwrap_err();
        assert!(matches!(err, MappingError::InvalidMigration { ref key, .. } if key == "y"));
        assert!(m.is_empty());
    }

    #[test]
    fn rename_keeps_the_accessor_lazy() {
        let record = archive();
        let mut m = Migrator::new(&record);
        m.rename("y", "z").unwrap();

        assert!(!m.contains("y"));
        let z = m.get("z").unwrap();
        assert!(z.is_bound());
        assert_eq!(z.source_key(), "y");
        assert_eq!(
            z.materialize::<Vec<String>>().unwrap(),
            Some(vec!["aoeu".to_string(), ";qjkx".to_string()])
        );
    }

    #[test]
    fn add_value_overwrites() {
        let mut m = Migrator::new(&EmptyReader);
        m.add_value("y", 1u8);
        m.add_value("y", 7.2f32);
        assert_eq!(m.len(), 1);
        assert_eq!(
            m.get("y").unwrap().materialize::<f32>().unwrap(),
            Some(7.2)
        );
    }

    #[test]
    fn later_steps_see_earlier_rewrites() {
        let record = archive();
        let mut m = Migrator::new(&record);
        m.rename("y", "z").unwrap();
        m.add_value("y", 7.2f32);
        m.transform("y", |y: f32| y as i64);

        let y = m.get("y").unwrap();
        assert_eq!(y.transform_count(), 1);
        assert_eq!(y.materialize::<i64>().unwrap(), Some(7));
    }

    #[test]
    fn transform_to_moves_and_converts() {
        let record = archive();
        let mut m = Migrator::new(&record);
        m.transform_to("x", "x_text", |x: i64| format!("#{x}"));

        assert!(!m.contains("x"));
        assert_eq!(
            m.get("x_text")
                .unwrap()
                .materialize::<String>()
                .unwrap()
                .as_deref(),
            Some("#5")
        );
    }

    #[test]
    fn plain_transform_skips_absent_values() {
        let mut m = Migrator::new(&EmptyReader);
        m.transform("missing", |v: u32| v + 1);
        assert_eq!(
            m.get("missing")
                .unwrap()
                .materialize::<u32>()
                .unwrap(),
            None
        );
    }

    #[test]
    fn optional_transform_can_fill_defaults() {
        let mut m = Migrator::new(&EmptyReader);
        m.transform_optional("retries", None, |v: Option<u32>| Some(v.unwrap_or(3)));
        assert_eq!(
            m.get("retries")
                .unwrap()
                .materialize::<u32>()
                .unwrap(),
            Some(3)
        );
    }

    #[test]
    fn remove_falls_back_to_the_store() {
        let mut m = Migrator::new(&EmptyReader);
        m.add_value("x", 1i64);
        assert!(m.remove("x"));
        assert!(!m.remove("x"));
        assert_eq!(m.keys().count(), 0);
    }
}
