//! The model-object abstraction the mapper reads from and writes to.
//!
//! The library never talks to a database. It only needs attribute get/set
//! semantics by name, so the whole contract is [`ModelObject`]. Any ORM
//! entity, settings struct, or plain attribute bag can implement it.
//!
//! Model objects are shared between the mapper, resolver hooks, and the
//! caller (who persists them afterwards), so they travel as
//! [`ModelHandle`]s: cheaply clonable, lockable handles to one instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use subforms_core::Value;

/// Attribute access by name over [`Value`]s.
///
/// Reading a missing attribute returns `None`; the mapper treats that as
/// "no value" rather than an error. Setting an attribute the object does
/// not know about is up to the implementation — [`MapModel`] simply
/// creates it, a typed struct may ignore it.
pub trait ModelObject: Send + Sync {
    /// Returns the value of the named attribute, or `None` if absent.
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// Sets the named attribute to the given value.
    fn set_attr(&mut self, name: &str, value: Value);
}

/// A shared, lockable handle to a model object.
///
/// The same handle may appear several times in the instance list returned
/// by [`Mapper::apply_form_data`](crate::mapper::Mapper::apply_form_data);
/// handles are compared by pointer identity via [`Arc::ptr_eq`].
pub type ModelHandle = Arc<Mutex<dyn ModelObject>>;

/// Wraps a model object into a [`ModelHandle`].
pub fn model_handle<M: ModelObject + 'static>(model: M) -> ModelHandle {
    Arc::new(Mutex::new(model))
}

/// Locks a model handle, absorbing mutex poisoning.
///
/// A panicking resolver or setter callable leaves the mutex poisoned; the
/// data inside is still the caller's to inspect, so the poison flag is
/// cleared rather than propagated as a second panic.
pub fn lock_model(handle: &ModelHandle) -> MutexGuard<'_, dyn ModelObject + 'static> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A model object backed by a plain attribute map.
///
/// Useful for tests and for callers that want to collect mapped values
/// without a real entity type.
#[derive(Debug, Clone, Default)]
pub struct MapModel {
    attrs: HashMap<String, Value>,
}

impl MapModel {
    /// Creates an empty `MapModel`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MapModel` with one attribute pre-set.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Returns the value of the named attribute, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Returns the number of attributes currently set.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl ModelObject for MapModel {
    fn get_attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }

    fn set_attr(&mut self, name: &str, value: Value) {
        self.attrs.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_model_get_set() {
        let mut m = MapModel::new().with_attr("item_name", "Database");
        assert_eq!(
            m.get_attr("item_name"),
            Some(Value::String("Database".to_string()))
        );
        assert_eq!(m.get_attr("missing"), None);

        m.set_attr("item_name", Value::String("Other".to_string()));
        assert_eq!(
            m.get("item_name"),
            Some(&Value::String("Other".to_string()))
        );
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_handle_identity() {
        let a = model_handle(MapModel::new());
        let b = a.clone();
        let c = model_handle(MapModel::new());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_lock_model_mutates_through_handle() {
        let handle = model_handle(MapModel::new());
        lock_model(&handle).set_attr("x", Value::Int(1));
        assert_eq!(lock_model(&handle).get_attr("x"), Some(Value::Int(1)));
    }
}
