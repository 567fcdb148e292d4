//! Transient builders for vector, map, and set.
//!
//! A transient is a single-owner mutable builder produced by `transient`
//! and frozen by `persistent!`. Operations after the freeze fail with
//! StateError. Transients never participate in equality and are not
//! valid keys.

use crate::{
    exception::{CoreError, RunResult},
    types::map::MapEntry,
    value::Value,
};

/// The mutable payload of a transient, by collection kind.
#[derive(Debug, Clone)]
pub enum TransientData {
    Vector(Vec<Value>),
    Map(Vec<MapEntry>),
    Set(Vec<Value>),
}

/// A transient builder cell.
#[derive(Debug, Clone)]
pub struct Transient {
    data: TransientData,
    alive: bool,
}

impl Transient {
    /// Wraps builder data in a live transient.
    #[must_use]
    pub fn new(data: TransientData) -> Self {
        Self { data, alive: true }
    }

    /// The collection kind this builder will freeze into.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.data {
            TransientData::Vector(_) => "vector",
            TransientData::Map(_) => "map",
            TransientData::Set(_) => "set",
        }
    }

    /// The builder data, failing with StateError after `persistent!`.
    pub fn data(&self) -> RunResult<&TransientData> {
        self.ensure_alive()?;
        Ok(&self.data)
    }

    /// Mutable builder data, failing with StateError after `persistent!`.
    pub fn data_mut(&mut self) -> RunResult<&mut TransientData> {
        self.ensure_alive()?;
        Ok(&mut self.data)
    }

    /// Freezes the builder and takes its data.
    pub fn freeze(&mut self) -> RunResult<TransientData> {
        self.ensure_alive()?;
        self.alive = false;
        Ok(std::mem::replace(&mut self.data, TransientData::Vector(Vec::new())))
    }

    fn ensure_alive(&self) -> RunResult<()> {
        if self.alive {
            Ok(())
        } else {
            Err(CoreError::state_error("transient used after persistent!"))
        }
    }
}
