//! Derived text rendering
//!
//! Handlers render a human-readable text export of a response into a
//! computed field (`output_text`). Templates are named functions from the
//! response's JSON form to text, registered per handler crate.
//!
//! Rendering failures are reported as [`Error::Render`]; resource Read paths
//! treat them as non-fatal and leave the computed field unset.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A named text template
pub type TemplateFn = fn(&Value) -> Result<String>;

/// Set of named output templates
#[derive(Default, Clone)]
pub struct OutputTemplates {
    templates: HashMap<&'static str, TemplateFn>,
}

impl std::fmt::Debug for OutputTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.templates.keys().collect();
        names.sort();
        f.debug_struct("OutputTemplates").field("templates", &names).finish()
    }
}

impl OutputTemplates {
    /// Create an empty template set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `name`, replacing any previous one
    pub fn register(&mut self, name: &'static str, template: TemplateFn) {
        self.templates.insert(name, template);
    }

    /// Check if a template is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render `data` with the template registered under `name`
    pub fn render<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::render(format!("unknown template '{}'", name)))?;
        let value = serde_json::to_value(data)
            .map_err(|e| Error::render(format!("template '{}': {}", name, e)))?;
        template(&value)
    }
}
