// Common test fixtures and helpers
#![allow(dead_code)]

use std::cell::RefCell;

use netabase_mappings::prelude::*;

/// Initialise logging once; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Version 0: `x` and a list of strings under `y`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct A {
    pub x: i64,
    pub y: Vec<String>,
}

impl Mappable for A {
    fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
        mapper.bind(&mut self.x, "x")?;
        mapper.bind(&mut self.y, "y")
    }
}

/// Moves the list from `y` to `z` and introduces a float `y`.
pub fn move_list_to_z(m: &mut Migrator<'_>) -> MappingResult<()> {
    m.rename("y", "z")?;
    m.add_value("y", 7.2f32);
    Ok(())
}

/// Narrows the float `y` to an integer.
pub fn truncate_y(m: &mut Migrator<'_>) -> MappingResult<()> {
    m.transform("y", |y: f32| y as i64);
    Ok(())
}

pub const B_MIGRATIONS: &[MigrationStep] = &[move_list_to_z];
pub const C_MIGRATIONS: &[MigrationStep] = &[move_list_to_z, truncate_y];

/// Version 1: the list lives under `z`, `y` is an optional float.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct B {
    pub x: i64,
    pub y: Option<f32>,
    pub z: Vec<String>,
}

impl Mappable for B {
    const MIGRATIONS: &'static [MigrationStep] = B_MIGRATIONS;

    fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
        mapper.bind(&mut self.x, "x")?;
        mapper.bind_optional(&mut self.y, "y")?;
        mapper.bind(&mut self.z, "z")
    }
}

/// Version 2: `x` is gone and `y` is a required integer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct C {
    pub y: i64,
    pub z: Vec<String>,
}

impl Mappable for C {
    const MIGRATIONS: &'static [MigrationStep] = C_MIGRATIONS;

    fn map_with(&mut self, mapper: &mut Mapper<'_>) -> MappingResult<()> {
        mapper.bind(&mut self.y, "y")?;
        mapper.bind(&mut self.z, "z")
    }
}

pub fn sample_a() -> A {
    A {
        x: 5,
        y: vec!["aoeu".to_string(), ";qjkx".to_string()],
    }
}

/// An encoded version 0 payload.
pub fn archived_a() -> Record {
    let mut record = Record::new();
    encode(&mut sample_a(), &mut record).unwrap();
    record
}

/// A reader that remembers every key it was asked for.
pub struct CountingReader<R> {
    inner: R,
    reads: RefCell<Vec<String>>,
}

impl<R: Reader> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            reads: RefCell::new(Vec::new()),
        }
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    pub fn was_read(&self, key: &str) -> bool {
        self.reads.borrow().iter().any(|k| k == key)
    }
}

impl<R: Reader> Reader for CountingReader<R> {
    fn read_value(&self, key: &str) -> MappingResult<Option<StoredValue>> {
        self.reads.borrow_mut().push(key.to_owned());
        self.inner.read_value(key)
    }
}
