//! Typed field accessor results
//!
//! Reading a field from Local State has three outcomes, and handlers must
//! treat them differently:
//!
//! - [`Field::Present`]: the field is set and has the expected type
//! - [`Field::Absent`]: the field is not set (recoverable; the field may be optional)
//! - [`Field::Invalid`]: the field is set but malformed (always fatal)

use crate::error::{Error, Result};

/// Outcome of reading one field from Local State
#[derive(Debug)]
pub enum Field<T> {
    /// The field is set and well-typed
    Present(T),
    /// The field is not set
    Absent,
    /// The field is set but could not be read as `T`
    Invalid(Error),
}

impl<T> Field<T> {
    /// Convert into a value, treating absence as a configuration error
    pub fn required(self, name: &str) -> Result<T> {
        match self {
            Field::Present(value) => Ok(value),
            Field::Absent => Err(Error::extraction(format!(
                "required field '{}' is not set",
                name
            ))),
            Field::Invalid(err) => Err(err),
        }
    }

    /// Convert into an optional value; only an invalid field is an error
    pub fn optional(self) -> Result<Option<T>> {
        match self {
            Field::Present(value) => Ok(Some(value)),
            Field::Absent => Ok(None),
            Field::Invalid(err) => Err(err),
        }
    }

    /// Check whether the field is set and valid
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Check whether the field is unset
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// Map the present value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Absent => Field::Absent,
            Field::Invalid(err) => Field::Invalid(err),
        }
    }
}

impl<T: Default> Field<T> {
    /// Convert into a value, using the zero value when the field is absent
    pub fn or_default(self) -> Result<T> {
        Ok(self.optional()?.unwrap_or_default())
    }
}
