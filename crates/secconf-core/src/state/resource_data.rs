// # Resource Data
//
// Local State of one resource or data-source instance: an optional
// identifier plus a map of field name to value.
//
// A handler owns the `ResourceData` exclusively for the duration of one
// operation. Persisting it afterwards is the caller's job (see
// `crate::engine::Reconciler`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::Field;

/// Local State of one instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Identifier; `None` means the instance does not exist locally
    #[serde(default)]
    id: Option<String>,

    /// Field values
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl ResourceData {
    /// Create empty Local State
    pub fn new() -> Self {
        Self::default()
    }

    /// Create Local State holding only an identifier (passthrough import)
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Create Local State from field values
    pub fn from_attributes<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            id: None,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    /// The identifier, if the instance exists
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Clear the identifier, marking the instance as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Raw value of a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    /// All field values
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Read an integer field
    pub fn get_int(&self, name: &str) -> Field<i64> {
        match self.get(name) {
            None => Field::Absent,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => Field::Present(v),
                None => Field::Invalid(Error::extraction(format!(
                    "field '{}': {} is not a 64-bit integer",
                    name, n
                ))),
            },
            Some(other) => Field::Invalid(Error::extraction(format!(
                "field '{}': expected integer, got {}",
                name,
                type_name(other)
            ))),
        }
    }

    /// Read a string field; an empty string counts as unset
    pub fn get_string(&self, name: &str) -> Field<String> {
        match self.get(name) {
            None => Field::Absent,
            Some(Value::String(s)) if s.is_empty() => Field::Absent,
            Some(Value::String(s)) => Field::Present(s.clone()),
            Some(other) => Field::Invalid(Error::extraction(format!(
                "field '{}': expected string, got {}",
                name,
                type_name(other)
            ))),
        }
    }

    /// Set a field from any serializable value
    ///
    /// Fails only if the value cannot be encoded.
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// Set a field from a raw value
    pub fn set_raw(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    /// Remove a field
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_int_outcomes() {
        let data = ResourceData::from_attributes([
            ("config_id", json!(43253)),
            ("security_policy_id", json!("AAAA_81230")),
            ("api_endpoint_id", Value::Null),
        ]);

        assert!(matches!(data.get_int("config_id"), Field::Present(43253)));
        assert!(data.get_int("api_endpoint_id").is_absent());
        assert!(data.get_int("missing").is_absent());
        assert!(matches!(data.get_int("security_policy_id"), Field::Invalid(_)));
    }

    #[test]
    fn test_get_string_outcomes() {
        let data = ResourceData::from_attributes([
            ("bot_id", json!("")),
            ("action", json!("deny")),
            ("version", json!(7)),
        ]);

        assert!(data.get_string("bot_id").is_absent());
        assert!(matches!(data.get_string("action"), Field::Present(ref s) if s == "deny"));
        assert!(matches!(data.get_string("version"), Field::Invalid(_)));
    }

    #[test]
    fn test_identifier_lifecycle() {
        let mut data = ResourceData::new();
        assert_eq!(data.id(), None);

        data.set_id("43253");
        assert_eq!(data.id(), Some("43253"));

        data.clear_id();
        assert_eq!(data.id(), None);
        // Clearing twice is harmless
        data.clear_id();
        assert_eq!(data.id(), None);
    }

    #[test]
    fn test_set_serializable_value() {
        let mut data = ResourceData::new();
        data.set("version", 7).unwrap();
        data.set("output_text", "table").unwrap();
        assert!(matches!(data.get_int("version"), Field::Present(7)));
        assert_eq!(data.get("output_text"), Some(&json!("table")));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut data = ResourceData::with_id("43253:7:AAAA_81230");
        data.set("action", "alert").unwrap();
        let json = serde_json::to_string(&data).unwrap();
        let back: ResourceData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
