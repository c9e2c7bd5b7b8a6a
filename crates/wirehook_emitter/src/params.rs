//! Dispatch payload passed to every callback.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HookError;

/// Payload delivered to callbacks by [`Emitter::fire_with`](crate::Emitter::fire_with).
///
/// `Params` wraps an arbitrary JSON value. The default is an empty object,
/// which is what [`Emitter::fire`](crate::Emitter::fire) sends. Every callback
/// receives its own copy, so mutations made by one callback are never seen by
/// the next.
///
/// # Example
///
/// ```
/// use wirehook_emitter::Params;
///
/// let params = Params::new().with("path", "/tmp/report.csv").with("bytes", 512);
/// assert_eq!(params.get("bytes").and_then(|v| v.as_u64()), Some(512));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Value);

impl Default for Params {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Params {
    /// Creates an empty object payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` into a payload.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, HookError> {
        Ok(Self(serde_json::to_value(value)?))
    }

    /// Returns the value stored under `key`, if the payload is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the payload as a JSON object, if it is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload, returning the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns `true` for an empty object or `null`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Deserializes the payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, HookError> {
        Ok(serde_json::from_value(self.0.clone())?)
    }

    /// Inserts `value` under `key`, returning the previous value.
    ///
    /// A payload that is not an object is replaced by an empty object first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.object_mut().insert(key.into(), value.into())
    }

    /// Serializes `value` and inserts it under `key`.
    pub fn insert_serialized<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), HookError> {
        let value = serde_json::to_value(value)?;
        self.object_mut().insert(key.into(), value);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`insert_serialized`](Self::insert_serialized).
    pub fn with_serialized<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, HookError> {
        self.insert_serialized(key, value)?;
        Ok(self)
    }

    fn object_mut(&mut self) -> &mut Map<String, Value> {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        match &mut self.0 {
            Value::Object(map) => map,
            _ => unreachable!("payload was just replaced by an object"),
        }
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        params.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_empty_object() {
        let params = Params::default();
        assert_eq!(params.value(), &json!({}));
        assert!(params.is_empty());
    }

    #[test]
    fn arbitrary_values_are_kept_verbatim() {
        let params = Params::from(json!([1, 2, 3]));
        assert_eq!(params.value(), &json!([1, 2, 3]));
        assert!(params.get("0").is_none());
        assert!(!params.is_empty());
    }

    #[test]
    fn insert_on_non_object_starts_a_fresh_object() {
        let mut params = Params::from(json!(42));
        params.insert("answer", 42);
        assert_eq!(params.value(), &json!({ "answer": 42 }));
    }

    #[test]
    fn serialized_round_trip_through_struct() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Progress {
            done: u32,
            total: u32,
        }

        let params = Params::from_serialize(&Progress { done: 3, total: 9 }).unwrap();
        assert_eq!(params.get("total"), Some(&json!(9)));
        assert_eq!(
            params.deserialize::<Progress>().unwrap(),
            Progress { done: 3, total: 9 }
        );
    }

    #[test]
    fn deserialize_mismatch_is_params_error() {
        let params = Params::new().with("done", "three");
        let result = params.deserialize::<u32>();
        assert!(matches!(result, Err(HookError::Params(_))));
    }

    #[test]
    fn clones_are_independent() {
        let original = Params::new().with("count", 1);
        let mut copy = original.clone();
        copy.insert("count", 2);
        assert_eq!(original.get("count"), Some(&json!(1)));
    }
}
