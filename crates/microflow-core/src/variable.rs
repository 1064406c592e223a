//! Ad-hoc variables passed into guards and hooks.
//!
//! Variables are stored type-erased under string keys. Any serde-serializable
//! value is a [`WorkflowVariable`], so workflows do not need to share a schema
//! and the whole bag can be snapshotted to JSON for persistence.
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{WorkflowError, WorkflowResult};

/// Capability marker for values that may be stored in a [`Variables`] bag.
pub trait WorkflowVariable: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Serialize the value for persistence.
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T> WorkflowVariable for T
where
    T: Serialize + Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// String-keyed, last-write-wins map of workflow variables.
#[derive(Debug, Default)]
pub struct Variables {
    entries: HashMap<String, Box<dyn WorkflowVariable>>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when preparing the variables of a trigger.
    pub fn with<T: WorkflowVariable>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`. Returns true if a previous value was replaced.
    pub fn insert<T: WorkflowVariable>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.entries.insert(key.into(), Box::new(value)).is_some()
    }

    /// Look up `key` as a `T`.
    ///
    /// Fails with [`WorkflowError::VariableNotFound`] when the key is absent and
    /// with [`WorkflowError::VariableTypeMismatch`] when it holds another type.
    pub fn get<T: WorkflowVariable>(&self, key: &str) -> WorkflowResult<&T> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| WorkflowError::VariableNotFound(key.to_string()))?;
        value
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| WorkflowError::VariableTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn get_mut<T: WorkflowVariable>(&mut self, key: &str) -> WorkflowResult<&mut T> {
        let value = self
            .entries
            .get_mut(key)
            .ok_or_else(|| WorkflowError::VariableNotFound(key.to_string()))?;
        value
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| WorkflowError::VariableTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn WorkflowVariable>> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Snapshot every variable into a JSON object keyed by variable name.
    pub fn to_json(&self) -> WorkflowResult<Map<String, Value>> {
        let mut map = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json()?);
        }
        Ok(map)
    }
}
