//! Package manifest synthesis.
//!
//! The generated `package.json` is built from the package's override object,
//! the root manifest's metadata and the dependencies found by the walker,
//! then put into a canonical key order so that identical inputs always
//! serialize to identical bytes.

use std::collections::BTreeMap;

use packing_manifest::{PackageSpec, RootManifest};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::Result;

/// Fields copied from the root manifest when the package does not set them.
pub const INHERITED_FIELDS: &[&str] = &[
    "version",
    "license",
    "author",
    "homepage",
    "repository",
    "bugs",
];

/// Fields emitted first, in this order. Everything else follows sorted by key.
pub const CANONICAL_ORDER: &[&str] = &[
    "name",
    "version",
    "private",
    "description",
    "keywords",
    "license",
    "author",
    "homepage",
    "repository",
    "bugs",
];

/// Build the manifest for one package.
pub fn synthesize(
    spec: &PackageSpec,
    root: &RootManifest,
    dependencies: &BTreeMap<String, String>,
) -> Map<String, Value> {
    let mut manifest = spec.package_json.clone().unwrap_or_default();

    manifest.insert("name".to_string(), Value::String(spec.name.clone()));

    for field in INHERITED_FIELDS {
        if manifest.get(*field).is_some_and(|v| !is_unset(v)) {
            continue;
        }
        match root.field(field) {
            Some(value) => {
                manifest.insert(field.to_string(), value.clone());
            }
            None => {
                manifest.remove(*field);
            }
        }
    }

    let dependencies = dependencies
        .iter()
        .map(|(name, version)| (name.clone(), Value::String(version.clone())))
        .collect();
    manifest.insert("dependencies".to_string(), Value::Object(dependencies));

    canonicalize(manifest)
}

/// `null` and `""` in an override mean "not specified".
fn is_unset(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some("")
}

/// Reorder keys: [`CANONICAL_ORDER`] first, then the rest lexicographically.
/// The `dependencies` object is sorted as well.
fn canonicalize(mut manifest: Map<String, Value>) -> Map<String, Value> {
    let mut ordered = Map::new();

    for key in CANONICAL_ORDER {
        if let Some(value) = manifest.remove(*key) {
            ordered.insert(key.to_string(), value);
        }
    }

    let mut rest: Vec<(String, Value)> = manifest.into_iter().collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, value) in rest {
        let value = match (key.as_str(), value) {
            ("dependencies", Value::Object(deps)) => Value::Object(sort_keys(deps)),
            (_, value) => value,
        };
        ordered.insert(key, value);
    }

    ordered
}

fn sort_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

/// Serialize a manifest with 4-space indentation and a trailing newline.
pub fn render_manifest(manifest: &Map<String, Value>) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    manifest.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
