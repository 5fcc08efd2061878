//! Handler schemas
//!
//! Each handler declares its fields once as a static [`Schema`]. The schema is
//! used at the boundary: to validate Local State before a mutating operation,
//! and to turn `key=value` input into typed values.
//!
//! ```rust
//! use secconf_core::schema::{FieldKind, FieldSchema, Schema};
//!
//! static SCHEMA: Schema = Schema::new(&[
//!     FieldSchema::required("config_id", FieldKind::Int),
//!     FieldSchema::optional("bot_id", FieldKind::String),
//!     FieldSchema::computed("json", FieldKind::String),
//! ]);
//!
//! assert!(SCHEMA.field("bot_id").is_some());
//! ```

use serde_json::Value;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::state::ResourceData;

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit integer
    Int,
    /// UTF-8 string
    String,
}

/// Who sets a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Must be set by configuration
    Required,
    /// May be set by configuration
    Optional,
    /// Set only by the handler
    Computed,
}

/// Declaration of one field
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    /// Field name
    pub name: &'static str,
    /// Value type
    pub kind: FieldKind,
    /// Who sets the field
    pub mode: FieldMode,
    /// Allowed string values; empty means unrestricted
    pub allowed: &'static [&'static str],
    /// Human-readable description
    pub description: &'static str,
}

impl FieldSchema {
    const fn with_mode(name: &'static str, kind: FieldKind, mode: FieldMode) -> Self {
        Self {
            name,
            kind,
            mode,
            allowed: &[],
            description: "",
        }
    }

    /// Declare a required field
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self::with_mode(name, kind, FieldMode::Required)
    }

    /// Declare an optional field
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self::with_mode(name, kind, FieldMode::Optional)
    }

    /// Declare a computed field
    pub const fn computed(name: &'static str, kind: FieldKind) -> Self {
        Self::with_mode(name, kind, FieldMode::Computed)
    }

    /// Restrict a string field to a set of values
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// Attach a description
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn check(&self, data: &ResourceData) -> Result<()> {
        let field = match self.kind {
            FieldKind::Int => data.get_int(self.name).map(|_| None),
            FieldKind::String => data.get_string(self.name).map(Some),
        };

        let value = match (field, self.mode) {
            (Field::Invalid(err), _) => return Err(err),
            (Field::Absent, FieldMode::Required) => {
                return Err(Error::extraction(format!(
                    "required field '{}' is not set",
                    self.name
                )));
            }
            (Field::Absent, _) => return Ok(()),
            (Field::Present(value), _) => value,
        };

        if let Some(s) = value
            && !self.allowed.is_empty()
            && !self.allowed.contains(&s.as_str())
        {
            return Err(Error::extraction(format!(
                "field '{}': expected one of [{}], got '{}'",
                self.name,
                self.allowed.join(", "),
                s
            )));
        }

        Ok(())
    }
}

/// Field declarations of one handler
#[derive(Debug)]
pub struct Schema {
    /// Declared fields
    pub fields: &'static [FieldSchema],
}

impl Schema {
    /// Create a schema from field declarations
    pub const fn new(fields: &'static [FieldSchema]) -> Self {
        Self { fields }
    }

    /// Look up a field declaration
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate Local State against the schema
    ///
    /// Checks that required fields are set, that every declared field has the
    /// declared type and allowed value, and that no undeclared field is set.
    pub fn validate(&self, data: &ResourceData) -> Result<()> {
        for name in data.attributes().keys() {
            if self.field(name).is_none() {
                return Err(Error::extraction(format!("unknown field '{}'", name)));
            }
        }

        for field in self.fields.iter().filter(|f| f.mode != FieldMode::Computed) {
            field.check(data)?;
        }

        Ok(())
    }

    /// Convert raw `key=value` text into a typed value
    pub fn parse_assignment(&self, name: &str, raw: &str) -> Result<Value> {
        let field = self
            .field(name)
            .ok_or_else(|| Error::invalid_input(format!("unknown field '{}'", name)))?;

        if field.mode == FieldMode::Computed {
            return Err(Error::invalid_input(format!(
                "field '{}' is computed and cannot be set",
                name
            )));
        }

        match field.kind {
            FieldKind::Int => raw.trim().parse::<i64>().map(Value::from).map_err(|_| {
                Error::invalid_input(format!("field '{}': '{}' is not an integer", name, raw))
            }),
            FieldKind::String => Ok(Value::String(raw.to_string())),
        }
    }

    /// Build Local State from `key=value` assignments
    pub fn parse_assignments<'a, I>(&self, assignments: I) -> Result<ResourceData>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut data = ResourceData::new();
        for assignment in assignments {
            let (name, raw) = assignment.split_once('=').ok_or_else(|| {
                Error::invalid_input(format!(
                    "assignment '{}' must have the form key=value",
                    assignment
                ))
            })?;
            let value = self.parse_assignment(name.trim(), raw)?;
            data.set_raw(name.trim(), value);
        }
        Ok(data)
    }
}
