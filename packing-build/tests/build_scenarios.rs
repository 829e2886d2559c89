//! End-to-end builds against projects laid out in a temporary directory.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use packing_build::{BuildError, BuildOptions, build_workspace};
use packing_manifest::Workspace;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project with one package `lib` whose entry imports a helper and lodash.
fn project(dependencies: &str) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path();

    write(
        root,
        "packing.json",
        r#"{
            "outDir": "dist",
            "packages": [{"name": "lib", "js": ["src/index.js"]}]
        }"#,
    );
    write(
        root,
        "package.json",
        &format!(
            r#"{{"name": "monorepo", "version": "1.0.0", "license": "MIT", "dependencies": {dependencies}}}"#
        ),
    );
    write(
        root,
        "src/index.js",
        "const helpers = require('./helpers.js');\nconst _ = require('lodash');\n",
    );
    write(root, "src/helpers.js", "module.exports = {};\n");
    write(root, "src/unused.js", "module.exports = 'unused';\n");

    temp
}

fn build(root: &Path) -> packing_build::Result<Vec<packing_build::PackageOutcome>> {
    let workspace = Workspace::open(root).expect("Failed to open workspace");
    build_workspace(&workspace, &BuildOptions::default(), |_| {})
}

/// Every file under `dir` with its bytes, keyed by slash-separated path.
fn snapshot_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fn visit(dir: &Path, base: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(&path, base, out);
            } else {
                let rel = path.strip_prefix(base).unwrap();
                let key = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                out.insert(key, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    visit(dir, dir, &mut out);
    out
}

#[test]
fn test_example_package_is_extracted() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    let out = temp.path().join("dist/lib");

    let outcomes = build(temp.path()).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].name, "lib");
    assert_eq!(
        outcomes[0].dependencies,
        vec![("lodash".to_string(), "^4.17.0".to_string())]
    );

    let files: Vec<String> = snapshot_tree(&out).into_keys().collect();
    assert_eq!(files, vec!["package.json", "src/helpers.js", "src/index.js"]);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "lib");
    assert_eq!(manifest["version"], "1.0.0");
    assert_eq!(manifest["license"], "MIT");
    assert_eq!(manifest["dependencies"], serde_json::json!({"lodash": "^4.17.0"}));
}

#[test]
fn test_undeclared_dependency_writes_nothing() {
    let temp = project("{}");

    let err = build(temp.path()).unwrap_err();

    assert!(matches!(
        &err,
        BuildError::UndeclaredDependency { package, importer }
            if package == "lodash" && importer == "src/index.js"
    ));
    assert!(err.is_known());
    assert!(!temp.path().join("dist/lib").exists());
}

#[test]
fn test_second_build_copies_nothing() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    let out = temp.path().join("dist/lib");

    let first = build(temp.path()).unwrap();
    assert_eq!(first[0].sync.copied.len(), 2);
    let before = snapshot_tree(&out);

    let second = build(temp.path()).unwrap();

    assert!(second[0].sync.copied.is_empty());
    assert_eq!(second[0].sync.up_to_date.len(), 2);
    assert!(second[0].sync.removed.is_empty());
    assert_eq!(snapshot_tree(&out), before);
}

#[test]
fn test_stale_files_and_empty_dirs_are_removed() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    let out = temp.path().join("dist/lib");
    write(&out, "src/old/removed.js", "");
    write(&out, "notes.txt", "");
    write(temp.path(), "dist/other/kept.js", "");

    let outcomes = build(temp.path()).unwrap();

    assert_eq!(
        outcomes[0].sync.removed,
        vec![
            PathBuf::from("notes.txt"),
            PathBuf::from("src/old/removed.js"),
            PathBuf::from("src/old"),
        ]
    );
    assert!(out.join("src/index.js").is_file());
    assert!(out.join("src/helpers.js").is_file());
    assert!(!out.join("src/old").exists());
    // Other packages' directories are never touched
    assert!(temp.path().join("dist/other/kept.js").is_file());
}

#[test]
fn test_manifest_is_deterministic() {
    let a = project(r#"{"zod": "3.0.0", "lodash": "^4.17.0"}"#);
    let b = project(r#"{"lodash": "^4.17.0", "zod": "3.0.0"}"#);
    for temp in [&a, &b] {
        write(temp.path(), "src/helpers.js", "require('zod');\nmodule.exports = {};\n");
    }

    build(a.path()).unwrap();
    build(b.path()).unwrap();

    let read = |temp: &TempDir| {
        fs::read_to_string(temp.path().join("dist/lib/package.json")).unwrap()
    };
    assert_eq!(read(&a), read(&b));
    assert!(read(&a).ends_with("}\n"));
    let dependencies = concat!(
        "    \"dependencies\": {\n",
        "        \"lodash\": \"^4.17.0\",\n",
        "        \"zod\": \"3.0.0\"\n",
        "    }"
    );
    assert!(read(&a).contains(dependencies));
}

#[test]
fn test_extra_file_escaping_package_is_rejected() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    write(temp.path(), "README.md", "");
    write(
        temp.path(),
        "packing.json",
        r#"{
            "outDir": "dist",
            "packages": [{
                "name": "lib",
                "js": ["src/index.js"],
                "files": [{"name": "../secrets.txt", "src": "README.md"}]
            }]
        }"#,
    );

    let err = build(temp.path()).unwrap_err();

    assert!(matches!(err, BuildError::PathEscape { .. }));
    assert!(!temp.path().join("dist/lib").exists());
    assert!(!temp.path().join("dist/secrets.txt").exists());
}

#[test]
fn test_import_cycles_terminate() {
    let temp = project("{}");
    write(temp.path(), "src/index.js", "require('./a');\n");
    write(temp.path(), "src/a.js", "require('./b');\n");
    write(temp.path(), "src/b.js", "require('./a');\nrequire('./index');\n");

    let outcomes = build(temp.path()).unwrap();

    let files: Vec<String> = snapshot_tree(&temp.path().join("dist/lib"))
        .into_keys()
        .collect();
    assert_eq!(files, vec!["package.json", "src/a.js", "src/b.js", "src/index.js"]);
    assert_eq!(outcomes[0].files, 3);
    assert!(outcomes[0].dependencies.is_empty());
}

#[test]
fn test_missing_entry_is_not_found() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    fs::remove_file(temp.path().join("src/helpers.js")).unwrap();

    let err = build(temp.path()).unwrap_err();

    assert_eq!(err.to_string(), "file src/helpers.js not found");
}

#[test]
fn test_packages_build_in_declaration_order() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    write(temp.path(), "tools/cli.js", "require('fs');\nrequire('node:path');\n");
    write(
        temp.path(),
        "packing.json",
        r#"{
            "outDir": "dist",
            "packages": [
                {"name": "tools", "js": ["tools/*.js"]},
                {"name": "lib", "js": ["src/index.js"]}
            ]
        }"#,
    );
    let workspace = Workspace::open(temp.path()).unwrap();

    let mut seen = Vec::new();
    build_workspace(&workspace, &BuildOptions::default(), |outcome| {
        seen.push(outcome.name.clone())
    })
    .unwrap();

    assert_eq!(seen, vec!["tools", "lib"]);
    assert!(temp.path().join("dist/tools/tools/cli.js").is_file());
}

#[test]
fn test_only_selects_packages_and_rejects_unknown_names() {
    let temp = project(r#"{"lodash": "^4.17.0"}"#);
    let workspace = Workspace::open(temp.path()).unwrap();

    let err = build_workspace(
        &workspace,
        &BuildOptions {
            dry_run: false,
            only: vec!["missing".to_string()],
        },
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::UnknownPackage { .. }));

    let outcomes = build_workspace(
        &workspace,
        &BuildOptions {
            dry_run: true,
            only: vec!["lib".to_string()],
        },
        |_| {},
    )
    .unwrap();
    assert_eq!(outcomes[0].sync.copied.len(), 2);
    assert!(!temp.path().join("dist/lib").exists());
}
