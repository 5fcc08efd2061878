//! Identity keys for remote objects
//!
//! A remote object is addressed by (config ID, version, security-policy ID,
//! optional sub-resource ID). The textual form is used as a resource's
//! identifier, which is what makes a passthrough import sufficient to
//! re-derive the full key on the next Read:
//!
//! ```text
//! 43253:7:AAAA_81230        policy-scoped
//! 43253:7:AAAA_81230:12345  scoped to sub-resource 12345
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Composite key addressing one remote object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    /// Security configuration ID
    pub config_id: i64,
    /// Configuration version
    pub version: i64,
    /// Security policy ID
    pub policy_id: String,
    /// Optional sub-resource ID (API endpoint, bot, ...)
    pub sub_id: Option<String>,
}

impl IdentityKey {
    /// Create a policy-scoped key
    pub fn new(config_id: i64, version: i64, policy_id: impl Into<String>) -> Self {
        Self {
            config_id,
            version,
            policy_id: policy_id.into(),
            sub_id: None,
        }
    }

    /// Scope the key to a sub-resource
    pub fn with_sub_id(mut self, sub_id: impl Into<String>) -> Self {
        let sub_id = sub_id.into();
        self.sub_id = if sub_id.is_empty() { None } else { Some(sub_id) };
        self
    }

    /// Whether both keys address the same remote object
    ///
    /// The version is ignored since an instance may move to a newer
    /// configuration version.
    pub fn same_object(&self, other: &IdentityKey) -> bool {
        self.config_id == other.config_id
            && self.policy_id == other.policy_id
            && self.sub_id == other.sub_id
    }

    /// Sub-resource ID parsed as an integer, 0 when unscoped
    pub fn sub_id_as_int(&self) -> Result<i64, Error> {
        match &self.sub_id {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| {
                Error::invalid_input(format!("identity sub-ID '{}' is not an integer", raw))
            }),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.config_id, self.version, self.policy_id)?;
        if let Some(sub_id) = &self.sub_id {
            write!(f, ":{}", sub_id)?;
        }
        Ok(())
    }
}

impl FromStr for IdentityKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(Error::invalid_input(format!(
                "identifier '{}' must have the form config_id:version:policy_id[:sub_id]",
                s
            )));
        }

        let config_id = parts[0].parse().map_err(|_| {
            Error::invalid_input(format!("identifier '{}': config_id is not an integer", s))
        })?;
        let version = parts[1].parse().map_err(|_| {
            Error::invalid_input(format!("identifier '{}': version is not an integer", s))
        })?;
        if parts[2].is_empty() {
            return Err(Error::invalid_input(format!(
                "identifier '{}': policy_id is empty",
                s
            )));
        }

        let key = IdentityKey::new(config_id, version, parts[2]);
        Ok(match parts.get(3) {
            Some(sub_id) => key.with_sub_id(*sub_id),
            None => key,
        })
    }
}
