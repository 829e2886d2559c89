//! Module graph traversal.
//!
//! Starting from a package's entry patterns, the walker follows relative
//! imports through the project, collecting every local file reached and the
//! external packages those files import.

use std::{
    collections::{BTreeMap, HashSet},
    ffi::OsString,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use packing_core::to_slash;
use tracing::{debug, trace};

use crate::{
    BuildError, ImportExtractor, JsImportScanner, Result, SourceTree, is_builtin_module,
    safety::ensure_within, specifier::Specifier,
};

/// Extension assumed for extension-less relative imports.
pub const SCRIPT_EXTENSION: &str = "js";

/// Extensions whose files are scanned for further imports.
const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// Everything a set of entry files transitively requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGraph {
    /// Local files in discovery order, each listed once
    pub files: IndexSet<PathBuf>,
    /// External packages imported by those files (name -> declared version)
    pub dependencies: BTreeMap<String, String>,
}

/// Walks the import graph of a package.
pub struct Walker<'a, T: SourceTree + ?Sized> {
    tree: &'a T,
    declared: &'a BTreeMap<String, String>,
    extractor: &'a dyn ImportExtractor,
    is_builtin: fn(&str) -> bool,
}

impl<'a, T: SourceTree + ?Sized> Walker<'a, T> {
    /// Create a walker over `tree`, validating packages against the `declared`
    /// dependencies of the root manifest.
    pub fn new(tree: &'a T, declared: &'a BTreeMap<String, String>) -> Self {
        Self {
            tree,
            declared,
            extractor: &JsImportScanner,
            is_builtin: is_builtin_module,
        }
    }

    /// Use a different import extractor.
    pub fn extractor(mut self, extractor: &'a dyn ImportExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a different built-in module predicate.
    pub fn builtins(mut self, is_builtin: fn(&str) -> bool) -> Self {
        self.is_builtin = is_builtin;
        self
    }

    /// Walk the graph reachable from the given entry patterns.
    ///
    /// Fails on the first undeclared package, escaping path or missing file.
    pub fn walk(&self, patterns: &[String]) -> Result<ModuleGraph> {
        let mut graph = ModuleGraph::default();
        let mut seen = HashSet::new();

        for pattern in patterns {
            for entry in self.tree.glob(pattern)? {
                self.visit(entry, &mut seen, &mut graph)?;
            }
        }

        Ok(graph)
    }

    /// Depth-first traversal from one entry using an explicit stack.
    fn visit(
        &self,
        entry: PathBuf,
        seen: &mut HashSet<PathBuf>,
        graph: &mut ModuleGraph,
    ) -> Result<()> {
        let mut stack = vec![entry];

        while let Some(file) = stack.pop() {
            let file = ensure_within(&file, None)?;
            if !seen.insert(file.clone()) {
                continue;
            }
            debug!(file = %to_slash(&file), "visiting module");

            let imports = if has_extension(&file, SCRIPT_EXTENSIONS) {
                let source = self.tree.read(&file)?;
                self.extractor.extract(&source)
            } else if self.tree.is_file(&file) {
                Vec::new()
            } else {
                return Err(BuildError::NotFound { path: file });
            };

            graph.files.insert(file.clone());
            for related in self.related_files(&file) {
                graph.files.insert(related);
            }

            let mut locals = Vec::new();
            for raw in &imports {
                match Specifier::classify(raw, self.is_builtin) {
                    Specifier::Relative(spec) => locals.push(self.resolve(&file, spec)?),
                    Specifier::Builtin => trace!(specifier = %raw, "skipping built-in module"),
                    Specifier::Package { root } => {
                        let version = self.declared.get(root).ok_or_else(|| {
                            BuildError::UndeclaredDependency {
                                package: root.to_string(),
                                importer: to_slash(&file),
                            }
                        })?;
                        trace!(package = root, version = %version, "found dependency");
                        graph
                            .dependencies
                            .entry(root.to_string())
                            .or_insert_with(|| version.clone());
                    }
                }
            }

            // Reversed so the first import is visited first
            stack.extend(locals.into_iter().rev());
        }

        Ok(())
    }

    /// Resolve a relative specifier against the importing file.
    ///
    /// Specifiers without an extension are scripts: `.js` is appended,
    /// falling back to a directory `index.js` when only that exists. Any
    /// other specifier names its file exactly.
    fn resolve(&self, importer: &Path, specifier: &str) -> Result<PathBuf> {
        let dir = importer.parent().unwrap_or(Path::new(""));
        let resolved = ensure_within(dir.join(specifier), None)?;

        if resolved.extension().is_some() {
            return Ok(resolved);
        }

        let script = with_suffix(&resolved, SCRIPT_EXTENSION);
        if !self.tree.is_file(&script) {
            let index = resolved.join("index").with_extension(SCRIPT_EXTENSION);
            if self.tree.is_file(&index) {
                return Ok(index);
            }
        }
        Ok(script)
    }

    /// Source map and type declaration siblings of a `.js` file, when present.
    fn related_files(&self, file: &Path) -> Vec<PathBuf> {
        if !has_extension(file, &[SCRIPT_EXTENSION]) {
            return Vec::new();
        }
        let base = file.with_extension("");
        [with_suffix(file, "map"), with_suffix(&base, "d.ts")]
            .into_iter()
            .filter(|candidate| self.tree.is_file(candidate))
            .collect()
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// Append `.suffix` to the full file name (e.g., "a.js" + "map" -> "a.js.map").
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTree;

    fn declared(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn entries(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    fn files(graph: &ModuleGraph) -> Vec<String> {
        graph.files.iter().map(to_slash).collect()
    }

    #[test]
    fn test_walks_local_imports_and_dependencies() {
        let tree = MemoryTree::new()
            .file(
                "src/index.js",
                "const h = require('./helpers.js');\nconst _ = require('lodash');",
            )
            .file("src/helpers.js", "const fs = require('fs');");
        let deps = declared(&[("lodash", "^4.17.0"), ("react", "18.0.0")]);

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["src/index.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["src/index.js", "src/helpers.js"]);
        assert_eq!(graph.dependencies, declared(&[("lodash", "^4.17.0")]));
    }

    #[test]
    fn test_extensionless_import_gets_script_extension() {
        let tree = MemoryTree::new()
            .file("index.js", "require('./lib/util'); require('./data.json')")
            .file("lib/util.js", "")
            .file("data.json", "{\"require('nope')\": 1}");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["index.js", "lib/util.js", "data.json"]);
    }

    #[test]
    fn test_imports_with_other_extensions_are_kept_as_is() {
        let tree = MemoryTree::new()
            .file(
                "index.js",
                "require('./template.html'); import './styles/main.css';",
            )
            .file("template.html", "<p>require('nope')</p>")
            .file("styles/main.css", "body {}");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap();

        assert_eq!(
            files(&graph),
            vec!["index.js", "template.html", "styles/main.css"]
        );
        assert!(graph.dependencies.is_empty());
    }

    #[test]
    fn test_directory_import_resolves_to_index() {
        let tree = MemoryTree::new()
            .file("index.js", "require('./lib')")
            .file("lib/index.js", "");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["index.js", "lib/index.js"]);
    }

    #[test]
    fn test_cycles_terminate_without_duplicates() {
        let tree = MemoryTree::new()
            .file("a.js", "require('./b')")
            .file("b.js", "require('./c')")
            .file("c.js", "require('./a'); require('./b.js')");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["a.js", "c.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_visit_order_is_depth_first() {
        let tree = MemoryTree::new()
            .file("main.js", "require('./x'); require('./y')")
            .file("x.js", "require('./z')")
            .file("y.js", "")
            .file("z.js", "");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["main.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["main.js", "x.js", "z.js", "y.js"]);
    }

    #[test]
    fn test_related_files_are_included_when_present() {
        let tree = MemoryTree::new()
            .file("lib/index.js", "")
            .file("lib/index.js.map", "{}")
            .file("lib/index.d.ts", "export {}")
            .file("lib/other.js", "")
            .file("lib/other.d.ts", "");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["lib/*.js"]))
            .unwrap();

        assert_eq!(
            files(&graph),
            vec![
                "lib/index.js",
                "lib/index.js.map",
                "lib/index.d.ts",
                "lib/other.js",
                "lib/other.d.ts",
            ]
        );
    }

    #[test]
    fn test_scoped_and_subpath_packages() {
        let tree = MemoryTree::new().file(
            "index.js",
            "import a from '@scope/pkg/sub/path';\nimport b from 'lodash/fp';\nimport c from 'lodash';",
        );
        let deps = declared(&[("@scope/pkg", "1.0.0"), ("lodash", "^4.17.0")]);

        let graph = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap();

        assert_eq!(graph.dependencies, deps);
    }

    #[test]
    fn test_undeclared_dependency_fails() {
        let tree = MemoryTree::new()
            .file("src/index.js", "require('./helpers')")
            .file("src/helpers.js", "require('left-pad')");
        let deps = BTreeMap::new();

        let err = Walker::new(&tree, &deps)
            .walk(&entries(&["src/index.js"]))
            .unwrap_err();

        match err {
            BuildError::UndeclaredDependency { package, importer } => {
                assert_eq!(package, "left-pad");
                assert_eq!(importer, "src/helpers.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_local_file_fails() {
        let tree = MemoryTree::new().file("index.js", "require('./gone')");
        let deps = BTreeMap::new();

        let err = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap_err();

        assert_eq!(err.to_string(), "file gone.js not found");
    }

    #[test]
    fn test_missing_non_script_file_fails() {
        let tree = MemoryTree::new().file("index.js", "require('./config.json')");
        let deps = BTreeMap::new();

        let err = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap_err();

        assert!(matches!(err, BuildError::NotFound { .. }));
    }

    #[test]
    fn test_import_outside_project_fails() {
        let tree = MemoryTree::new().file("index.js", "require('../outside')");
        let deps = BTreeMap::new();

        let err = Walker::new(&tree, &deps)
            .walk(&entries(&["index.js"]))
            .unwrap_err();

        assert!(matches!(err, BuildError::PathEscape { .. }));
    }

    #[test]
    fn test_custom_builtins_and_extractor() {
        struct LinesExtractor;
        impl ImportExtractor for LinesExtractor {
            fn extract(&self, source: &str) -> Vec<String> {
                source.lines().map(str::to_string).collect()
            }
        }

        let tree = MemoryTree::new()
            .file("index.js", "electron\n./window")
            .file("window.js", "");
        let deps = BTreeMap::new();

        let graph = Walker::new(&tree, &deps)
            .extractor(&LinesExtractor)
            .builtins(|name| name == "electron")
            .walk(&entries(&["index.js"]))
            .unwrap();

        assert_eq!(files(&graph), vec!["index.js", "window.js"]);
        assert!(graph.dependencies.is_empty());
    }
}
