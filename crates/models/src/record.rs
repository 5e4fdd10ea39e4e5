//! Schemaless record value shared by every collection.
//!
//! A record is a flat JSON object. Records created through the API and loaded
//! from seed files carry an integer `id`; replacement bodies may omit it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

/// Field name under which the store reference is rendered.
pub const REF_FIELD: &str = "_id";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Accept a JSON value only if it is an object.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ModelError::Validation(format!(
                "record must be a JSON object, got {other}"
            ))),
        }
    }

    /// Integer `id` field, if present.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn require_id(&self) -> Result<i64, ModelError> {
        self.id()
            .ok_or_else(|| ModelError::Validation("record must carry an integer `id`".into()))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field-level `$set`: every field of `patch` overwrites the same field here.
    pub fn merge(&mut self, patch: &Record) {
        for (k, v) in &patch.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Render the record with its store reference under [`REF_FIELD`].
    pub fn with_ref(&self, reference: RecordRef) -> Value {
        let mut map = self.0.clone();
        map.insert(REF_FIELD.to_string(), Value::String(reference.to_string()));
        Value::Object(map)
    }
}

/// Store-assigned reference identifier, independent of the record's own `id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRef(pub Uuid);

impl RecordRef {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A record as held by a store: its key, its reference and its body.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredRecord {
    pub key: i64,
    pub reference: RecordRef,
    pub record: Record,
}
