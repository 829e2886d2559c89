//! The project's root `package.json`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Root package manifest.
///
/// Only `dependencies` is typed; every other top-level field is kept in
/// declaration order so that inherited metadata can be looked up by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootManifest {
    /// Declared external dependencies (name -> version constraint)
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Remaining top-level fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RootManifest {
    /// Get a top-level field, treating `null` as absent.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }
}
