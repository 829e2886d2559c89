//! The project's `package-lock.json`.

use serde_json::Value;

/// Lockfile payload.
///
/// The build never resolves versions from it, so the content is kept as an
/// opaque JSON value. Loading it still proves the file is well-formed.
#[derive(Debug, Clone)]
pub struct Lockfile {
    raw: Value,
}

impl Lockfile {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The `lockfileVersion` field, when present.
    pub fn lockfile_version(&self) -> Option<u64> {
        self.raw.get("lockfileVersion").and_then(Value::as_u64)
    }
}
