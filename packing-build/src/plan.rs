//! Per-package build planning.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use packing_core::to_slash;
use packing_manifest::{MANIFEST_FILE, PackageFile, PackageSpec, Workspace};
use serde_json::{Map, Value};

use crate::{
    BuildError, DiskTree, Result, SourceTree, Walker, manifest::synthesize, safety::ensure_within,
};

/// A file to place in the output package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Copied from the same relative path in the project
    Same(PathBuf),
    /// Copied from `src` to `name`
    Renamed { name: PathBuf, src: PathBuf },
}

impl FileEntry {
    /// Destination, relative to the package output directory.
    pub fn name(&self) -> &Path {
        match self {
            FileEntry::Same(path) => path,
            FileEntry::Renamed { name, .. } => name,
        }
    }

    /// Source, relative to the project root.
    pub fn src(&self) -> &Path {
        match self {
            FileEntry::Same(path) => path,
            FileEntry::Renamed { src, .. } => src,
        }
    }
}

/// Everything needed to write one package.
#[derive(Debug, Clone)]
pub struct Build {
    /// Package name
    pub package: String,
    /// Output directory of the package
    pub out_dir: PathBuf,
    /// Files in the order they were discovered, one per destination
    pub files: Vec<FileEntry>,
    /// Generated package.json content
    pub manifest: Map<String, Value>,
}

impl Build {
    /// Destination names the synchronizer must keep, including the manifest.
    pub fn preserve_set(&self) -> HashSet<PathBuf> {
        self.files
            .iter()
            .map(|f| f.name().to_path_buf())
            .chain(std::iter::once(PathBuf::from(MANIFEST_FILE)))
            .collect()
    }

    /// Dependencies written into the manifest.
    pub fn dependencies(&self) -> Vec<(&str, &str)> {
        self.manifest
            .get("dependencies")
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(name, version)| Some((name.as_str(), version.as_str()?)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Plan a package from the project on disk.
pub fn plan(workspace: &Workspace, spec: &PackageSpec) -> Result<Build> {
    plan_with(workspace, spec, &DiskTree::new(workspace.root()))
}

/// Plan a package against any source tree.
pub fn plan_with<T: SourceTree + ?Sized>(
    workspace: &Workspace,
    spec: &PackageSpec,
    tree: &T,
) -> Result<Build> {
    let graph = Walker::new(tree, &workspace.manifest().dependencies).walk(&spec.js)?;

    let mut files: IndexMap<PathBuf, FileEntry> = IndexMap::new();
    for file in graph.files {
        add(&mut files, FileEntry::Same(file))?;
    }

    for extra in &spec.files {
        match extra {
            PackageFile::Path(pattern) => {
                for item in tree.glob(pattern)? {
                    let name = ensure_within(&item, Some(&outside_package(&item)))?;
                    add(&mut files, FileEntry::Same(name))?;
                }
            }
            PackageFile::Renamed { name, src } => {
                let name = ensure_within(name, Some(&outside_package(Path::new(name))))?;
                let src = ensure_within(src, None)?;
                add(&mut files, FileEntry::Renamed { name, src })?;
            }
        }
    }

    Ok(Build {
        package: spec.name.clone(),
        out_dir: workspace.package_dir(spec),
        files: files.into_values().collect(),
        manifest: synthesize(spec, workspace.manifest(), &graph.dependencies),
    })
}

fn outside_package(path: &Path) -> String {
    format!(
        "attempt to save a file outside of package: {}",
        to_slash(path)
    )
}

/// Record an entry; the first entry for a destination wins.
fn add(files: &mut IndexMap<PathBuf, FileEntry>, entry: FileEntry) -> Result<()> {
    if entry.name() == Path::new(MANIFEST_FILE) {
        return Err(BuildError::ReservedDestination {
            name: MANIFEST_FILE.to_string(),
        });
    }
    files.entry(entry.name().to_path_buf()).or_insert(entry);
    Ok(())
}

#[cfg(test)]
mod tests {
    use packing_manifest::{PackingConfig, RootManifest};
    use serde_json::json;

    use super::*;
    use crate::testing::MemoryTree;

    fn workspace(package: Value) -> (Workspace, PackageSpec) {
        let config: PackingConfig = serde_json::from_value(json!({
            "outDir": "dist",
            "packages": [package]
        }))
        .unwrap();
        let manifest: RootManifest = serde_json::from_value(json!({
            "version": "1.0.0",
            "dependencies": {"lodash": "^4.17.0"}
        }))
        .unwrap();
        let spec = config.packages[0].clone();
        (Workspace::new("/project", config, manifest, None), spec)
    }

    fn tree() -> MemoryTree {
        MemoryTree::new()
            .file("src/index.js", "require('./helpers.js'); require('lodash')")
            .file("src/helpers.js", "")
            .file("README.md", "# lib")
            .file("docs/a.md", "")
            .file("docs/b.md", "")
            .file("LICENSE.txt", "MIT")
    }

    #[test]
    fn test_plan_collects_files_and_dependencies() {
        let (ws, spec) = workspace(json!({
            "name": "lib",
            "js": ["src/index.js"],
            "files": ["README.md", "docs/*.md", {"name": "LICENSE", "src": "LICENSE.txt"}]
        }));

        let build = plan_with(&ws, &spec, &tree()).unwrap();

        assert_eq!(build.package, "lib");
        assert_eq!(build.out_dir, PathBuf::from("/project/dist/lib"));
        assert_eq!(
            build.files,
            vec![
                FileEntry::Same("src/index.js".into()),
                FileEntry::Same("src/helpers.js".into()),
                FileEntry::Same("README.md".into()),
                FileEntry::Same("docs/a.md".into()),
                FileEntry::Same("docs/b.md".into()),
                FileEntry::Renamed {
                    name: "LICENSE".into(),
                    src: "LICENSE.txt".into()
                },
            ]
        );
        assert_eq!(build.dependencies(), vec![("lodash", "^4.17.0")]);
        assert_eq!(build.manifest["version"], "1.0.0");
    }

    #[test]
    fn test_preserve_set_includes_manifest() {
        let (ws, spec) = workspace(json!({"name": "lib", "js": ["src/index.js"]}));
        let build = plan_with(&ws, &spec, &tree()).unwrap();

        let preserve = build.preserve_set();
        assert!(preserve.contains(Path::new("src/index.js")));
        assert!(preserve.contains(Path::new("src/helpers.js")));
        assert!(preserve.contains(Path::new("package.json")));
        assert_eq!(preserve.len(), 3);
    }

    #[test]
    fn test_duplicate_destinations_collapse() {
        let (ws, spec) = workspace(json!({
            "name": "lib",
            "js": ["src/index.js"],
            "files": ["src/helpers.js", "./README.md", "README.md"]
        }));

        let build = plan_with(&ws, &spec, &tree()).unwrap();
        assert_eq!(build.files.len(), 3);
    }

    #[test]
    fn test_extra_file_outside_package_fails() {
        let (ws, spec) = workspace(json!({
            "name": "lib",
            "js": ["src/index.js"],
            "files": [{"name": "../secrets.txt", "src": "README.md"}]
        }));

        let err = plan_with(&ws, &spec, &tree()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "attempt to save a file outside of package: ../secrets.txt"
        );
    }

    #[test]
    fn test_bare_extra_file_outside_package_fails() {
        let (ws, spec) = workspace(json!({
            "name": "lib",
            "js": [],
            "files": ["../secrets.txt"]
        }));

        let err = plan_with(&ws, &spec, &tree()).unwrap_err();
        assert!(matches!(err, BuildError::PathEscape { .. }));
    }

    #[test]
    fn test_manifest_destination_is_reserved() {
        let (ws, spec) = workspace(json!({
            "name": "lib",
            "js": ["src/index.js"],
            "files": [{"name": "package.json", "src": "README.md"}]
        }));

        let err = plan_with(&ws, &spec, &tree()).unwrap_err();
        assert!(matches!(err, BuildError::ReservedDestination { .. }));
    }

    #[test]
    fn test_undeclared_dependency_aborts_plan() {
        let (ws, spec) = workspace(json!({"name": "lib", "js": ["src/index.js"]}));
        let tree = tree().file("src/helpers.js", "require('chalk')");

        let err = plan_with(&ws, &spec, &tree).unwrap_err();
        assert!(matches!(err, BuildError::UndeclaredDependency { .. }));
    }
}
