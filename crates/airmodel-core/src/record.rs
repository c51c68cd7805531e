//! Raw records as returned by the remote store.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::{Error, TypeError};
use crate::field::{FieldKind, FieldMapping};
use crate::value::Value;

/// A single record fetched from a remote table.
///
/// Field keys are always backend field names. Use the mapping-aware
/// accessors to read by logical attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned record identifier
    pub id: Option<String>,
    /// Creation timestamp as reported by the store
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// Cell values keyed by backend field name
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Create a record with an id and no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set a backend field (builder style).
    pub fn with_field(mut self, field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(field_name.into(), serde_json::Value::from(value.into()));
        self
    }

    /// Read a cell by backend field name. Absent cells read as `Value::Null`.
    pub fn get(&self, field_name: &str) -> Value {
        self.fields
            .get(field_name)
            .cloned()
            .map_or(Value::Null, Value::from)
    }

    /// Read a cell by logical attribute name, resolved through `mapping`.
    ///
    /// Boolean fields read an absent cell as `false`.
    pub fn attribute(&self, mapping: &FieldMapping, name: &str) -> Value {
        let value = self.get(mapping.resolve(name));
        match mapping.get(name) {
            Some(def) if def.kind == FieldKind::Boolean && value.is_null() => Value::Bool(false),
            _ => value,
        }
    }

    /// Read and convert a cell by logical attribute name.
    pub fn get_as<T>(&self, mapping: &FieldMapping, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        T::try_from(self.attribute(mapping, name)).map_err(|e| match e {
            Error::Type(te) => Error::Type(TypeError {
                field: Some(name.to_string()),
                ..te
            }),
            other => other,
        })
    }

    /// Read and convert a cell, mapping an absent cell to `None`.
    pub fn get_opt<T>(&self, mapping: &FieldMapping, name: &str) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = Error>,
    {
        if self.attribute(mapping, name).is_null() {
            return Ok(None);
        }
        self.get_as(mapping, name).map(Some)
    }

    /// Check whether a logical attribute holds a present (non-blank) value.
    pub fn is_present(&self, mapping: &FieldMapping, name: &str) -> bool {
        match mapping.get(name) {
            Some(def) if def.kind == FieldKind::Boolean => {
                self.attribute(mapping, name).as_bool().unwrap_or(false)
            }
            _ => self.attribute(mapping, name).is_present(),
        }
    }

    /// Fields that may be written back to the store (read-only columns removed).
    pub fn serializable_fields(
        &self,
        mapping: &FieldMapping,
    ) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .filter(|(field_name, _)| !mapping.is_readonly(field_name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Re-key fields by logical name. Unmapped backend fields keep their name.
    pub fn to_attributes(&self, mapping: &FieldMapping) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|(field_name, value)| {
                let name = mapping
                    .logical_name(field_name)
                    .unwrap_or(field_name.as_str());
                (name.to_string(), Value::from(value.clone()))
            })
            .collect()
    }
}
