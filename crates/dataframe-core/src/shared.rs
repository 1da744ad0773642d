use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::field::DataField;
use crate::frame::DataFrame;
use crate::value::Value;

/// A frame shared between threads.
///
/// Every operation takes the same lock, so mutations and serialization of
/// one shared frame are linearized. Clones share the underlying frame.
#[derive(Debug, Clone, Default)]
pub struct SharedFrame {
    inner: Arc<Mutex<DataFrame>>,
}

impl SharedFrame {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            inner: Arc::new(Mutex::new(frame)),
        }
    }

    /// Lock the frame for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, DataFrame> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, name: Option<&str>, value: impl Into<Value>) -> Result<usize> {
        self.lock().add(name, value)
    }

    pub fn put(&self, name: Option<&str>, value: impl Into<Value>) -> Result<usize> {
        self.lock().put(name, value)
    }

    pub fn remove(&self, name: &str) -> Option<DataField> {
        self.lock().remove(name)
    }

    pub fn remove_all(&self, name: &str) -> Vec<DataField> {
        self.lock().remove_all(name)
    }

    pub fn field(&self, name: &str) -> Option<DataField> {
        self.lock().field(name).cloned()
    }

    pub fn field_count(&self) -> usize {
        self.lock().field_count()
    }

    pub fn to_wire_bytes(&self) -> Vec<u8> {
        self.lock().to_wire_bytes()
    }

    /// A deep copy of the current state.
    pub fn snapshot(&self) -> DataFrame {
        self.lock().clone()
    }

    /// Take the frame back out, if this is the last handle.
    pub fn try_unwrap(self) -> std::result::Result<DataFrame, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

impl From<DataFrame> for SharedFrame {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}
