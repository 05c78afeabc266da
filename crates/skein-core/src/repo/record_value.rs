//! Untyped record payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::types::Nsid;

/// A record payload whose schema is not known to this crate.
///
/// Always a JSON object whose `$type` field is a string. Enforced at
/// construction and on deserialization.
///
/// # Example
///
/// ```
/// use skein_core::RecordValue;
/// use serde_json::json;
///
/// let value = RecordValue::new(json!({
///     "$type": "app.bsky.feed.like",
///     "createdAt": "2024-01-01T00:00:00Z"
/// })).unwrap();
///
/// assert_eq!(value.record_type(), "app.bsky.feed.like");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue(Map<String, Value>);

impl RecordValue {
    /// Wrap a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or lacks a string
    /// `$type`.
    pub fn new(value: Value) -> Result<Self, Error> {
        let map = into_object(value)?;
        match map.get("$type") {
            Some(Value::String(_)) => Ok(Self(map)),
            Some(_) => Err(invalid("$type field must be a string")),
            None => Err(invalid("record value must contain a $type field")),
        }
    }

    /// Wrap a JSON object, setting `$type` to `collection`.
    ///
    /// An existing `$type` is overwritten.
    pub fn with_type(collection: &Nsid, value: Value) -> Result<Self, Error> {
        let mut map = into_object(value)?;
        map.insert(
            "$type".to_string(),
            Value::String(collection.as_str().to_string()),
        );
        Ok(Self(map))
    }

    /// Serialize a payload for `collection`.
    ///
    /// The payload must serialize to a JSON object. When it has no `$type`,
    /// the collection NSID is inserted; an existing `$type` is kept as is.
    pub fn from_serializable<T: Serialize + ?Sized>(
        collection: &Nsid,
        payload: &T,
    ) -> Result<Self, Error> {
        let mut map = into_object(serde_json::to_value(payload)?)?;
        match map.get("$type") {
            Some(Value::String(_)) => {}
            Some(_) => return Err(invalid("$type field must be a string")),
            None => {
                map.insert(
                    "$type".to_string(),
                    Value::String(collection.as_str().to_string()),
                );
            }
        }
        Ok(Self(map))
    }

    /// The `$type` field.
    pub fn record_type(&self) -> &str {
        self.0.get("$type").and_then(Value::as_str).unwrap_or_default()
    }

    /// Get a field from the record value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Decode into a typed payload.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(T::deserialize(Value::Object(self.0.clone()))?)
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid("record value must be a JSON object")),
    }
}

fn invalid(reason: &str) -> Error {
    InvalidInputError::RecordValue {
        reason: reason.to_string(),
    }
    .into()
}

impl Serialize for RecordValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RecordValue::new(value).map_err(serde::de::Error::custom)
    }
}
