use std::path::{Path, PathBuf};

use crate::{Lockfile, PackageSpec, PackingConfig, Result, RootManifest, json};

/// Workspace configuration file name
pub const CONFIG_FILE: &str = "packing.json";
/// Root package manifest file name (also the generated manifest's name)
pub const MANIFEST_FILE: &str = "package.json";
/// Root lockfile name
pub const LOCKFILE: &str = "package-lock.json";

/// A loaded project: configuration, root manifest and lockfile.
///
/// Everything is read once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: PackingConfig,
    manifest: RootManifest,
    lockfile: Option<Lockfile>,
}

impl Workspace {
    /// Load `packing.json`, `package.json` and (if present) `package-lock.json`
    /// from the given project root.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        let config_src = json::read_source(&root.join(CONFIG_FILE))?;
        let config: PackingConfig = json::parse(&config_src)?;
        config.validate(&config_src)?;

        let manifest_src = json::read_source(&root.join(MANIFEST_FILE))?;
        let manifest: RootManifest = json::parse(&manifest_src)?;

        let lock_path = root.join(LOCKFILE);
        let lockfile = if lock_path.is_file() {
            let lock_src = json::read_source(&lock_path)?;
            Some(Lockfile::new(json::parse(&lock_src)?))
        } else {
            None
        };

        Ok(Self::new(root, config, manifest, lockfile))
    }

    /// Assemble a workspace from already-loaded parts.
    pub fn new(
        root: impl Into<PathBuf>,
        config: PackingConfig,
        manifest: RootManifest,
        lockfile: Option<Lockfile>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            manifest,
            lockfile,
        }
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parsed `packing.json`.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Parsed root `package.json`.
    pub fn manifest(&self) -> &RootManifest {
        &self.manifest
    }

    /// Parsed `package-lock.json`, if the project has one.
    pub fn lockfile(&self) -> Option<&Lockfile> {
        self.lockfile.as_ref()
    }

    /// Declared packages in build order.
    pub fn packages(&self) -> &[PackageSpec] {
        &self.config.packages
    }

    /// Absolute (root-joined) output directory.
    pub fn out_dir(&self) -> PathBuf {
        self.root.join(&self.config.out_dir)
    }

    /// Output directory of one package.
    pub fn package_dir(&self, package: &PackageSpec) -> PathBuf {
        self.out_dir().join(&package.name)
    }
}
