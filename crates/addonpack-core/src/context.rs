//! Build context threaded through every packaging and sync operation.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::archive::{Archiver, ArchiverKind, CommandArchiver, ZipArchiver};
use crate::bundle::ExclusionFilter;
use crate::config::{BuildSettings, PackConfig, SyncSettings};
use crate::git::GitCli;
use crate::manifest::{manifest_path, retrieve_addon_name};

/// Resolved absolute paths and settings for one add-on.
///
/// Frontends create this once per invocation and hand it to commands;
/// nothing downstream consults the process working directory.
#[derive(Debug, Clone)]
pub struct BuildContext {
    addon_root: PathBuf,
    addon_name: String,
    addons_root: PathBuf,
    build_root: PathBuf,
    build: BuildSettings,
    sync: SyncSettings,
}

impl BuildContext {
    /// Create a context for the add-on at `addon_root` with explicit config.
    pub fn new(addon_root: &Path, config: &PackConfig) -> anyhow::Result<Self> {
        let addon_root = std::fs::canonicalize(addon_root).with_context(|| {
            format!("Failed to resolve add-on directory: {}", addon_root.display())
        })?;
        let addon_name = retrieve_addon_name(&addon_root)?;
        let addons_root = addon_root
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Add-on directory has no parent"))?
            .to_path_buf();

        let build = config.build_settings();
        let sync = config.sync_settings();
        let build_root = resolve_relative(&addon_root, &build.output_dir)?;

        Ok(Self {
            addon_root,
            addon_name,
            addons_root,
            build_root,
            build,
            sync,
        })
    }

    /// Override the build root (the directory holding `<Name>/` and the archive).
    pub fn with_build_root(mut self, build_root: impl Into<PathBuf>) -> Self {
        self.build_root = build_root.into();
        self
    }

    pub fn with_archiver(mut self, archiver: ArchiverKind) -> Self {
        self.build.archiver = archiver;
        self
    }

    pub fn addon_root(&self) -> &Path {
        &self.addon_root
    }

    pub fn addon_name(&self) -> &str {
        &self.addon_name
    }

    /// Directory holding the add-on and its sibling dependencies.
    pub fn addons_root(&self) -> &Path {
        &self.addons_root
    }

    pub fn build_settings(&self) -> &BuildSettings {
        &self.build
    }

    pub fn sync_settings(&self) -> &SyncSettings {
        &self.sync
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.addon_root, &self.addon_name)
    }

    /// Sibling directory expected to hold dependency `name`.
    pub fn dependency_dir(&self, name: &str) -> PathBuf {
        self.addons_root.join(name)
    }

    pub fn dependency_manifest_path(&self, name: &str) -> PathBuf {
        manifest_path(&self.dependency_dir(name), name)
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// `<build root>/<Name>`, cleared at the start of every build.
    pub fn build_dir(&self) -> PathBuf {
        self.build_root.join(&self.addon_name)
    }

    /// Archives are written one level above the build directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.build_root.join(file_name)
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.addon_root.join(&self.sync.libraries_dir)
    }

    pub fn pin_file_path(&self) -> PathBuf {
        self.addon_root.join(&self.sync.pin_file)
    }

    pub fn package_meta_path(&self) -> PathBuf {
        self.addon_root.join(&self.sync.package_meta_file)
    }

    /// Every manifest variant, e.g. `Foo.toc`, `Foo_Wrath.toc`.
    pub fn manifest_variant_paths(&self) -> Vec<PathBuf> {
        self.sync
            .manifest_variants
            .iter()
            .map(|suffix| {
                manifest_path(&self.addon_root, &format!("{}{}", self.addon_name, suffix))
            })
            .collect()
    }

    pub fn exclusion_filter(&self) -> ExclusionFilter {
        ExclusionFilter::new(
            self.build.exclude_names.iter().cloned(),
            self.build.exclude_extensions.iter().cloned(),
        )
    }

    pub fn archiver(&self) -> Box<dyn Archiver> {
        match self.build.archiver {
            ArchiverKind::Zip => Box::new(ZipArchiver::new()),
            ArchiverKind::SevenZip => {
                Box::new(CommandArchiver::new(self.build.seven_zip_program.clone()))
            }
        }
    }

    pub fn source_control(&self) -> GitCli {
        GitCli::with_program(self.sync.git_program.clone())
    }
}

/// Join `path` onto `base` and fold `.`/`..` lexically.
fn resolve_relative(base: &Path, path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let mut resolved = base.to_path_buf();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    anyhow::bail!(
                        "Output directory {} escapes the filesystem root from {}",
                        path.display(),
                        base.display()
                    );
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let addon = temp.path().join("src").join("AddOns").join("MyAddOn");
        std::fs::create_dir_all(&addon).unwrap();
        (temp, addon)
    }

    #[test]
    fn default_layout_puts_build_two_levels_up() {
        let (temp, addon) = setup();
        let ctx = BuildContext::new(&addon, &PackConfig::default()).unwrap();
        let root = std::fs::canonicalize(temp.path()).unwrap();

        assert_eq!(ctx.addon_name(), "MyAddOn");
        assert_eq!(ctx.build_root(), root.join("src").join("build"));
        assert_eq!(ctx.build_dir(), root.join("src").join("build").join("MyAddOn"));
        assert_eq!(
            ctx.output_path("MyAddOn.zip"),
            root.join("src").join("build").join("MyAddOn.zip")
        );
    }

    #[test]
    fn dependencies_are_siblings() {
        let (_temp, addon) = setup();
        let ctx = BuildContext::new(&addon, &PackConfig::default()).unwrap();
        let addons = ctx.addons_root().to_path_buf();

        assert_eq!(ctx.dependency_dir("LibStub"), addons.join("LibStub"));
        assert_eq!(
            ctx.dependency_manifest_path("LibStub"),
            addons.join("LibStub").join("LibStub.toc")
        );
    }

    #[test]
    fn manifest_variants_follow_suffixes() {
        let (_temp, addon) = setup();
        let ctx = BuildContext::new(&addon, &PackConfig::default()).unwrap();
        let names: Vec<String> = ctx
            .manifest_variant_paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["MyAddOn.toc", "MyAddOn_Wrath.toc", "MyAddOn_Vanilla.toc"]
        );
    }

    #[test]
    fn configured_output_dir_is_relative_to_addon() {
        let (_temp, addon) = setup();
        let mut config = PackConfig::default();
        config.build.output_dir = Some(PathBuf::from("./dist"));
        let ctx = BuildContext::new(&addon, &config).unwrap();
        assert_eq!(ctx.build_root(), ctx.addon_root().join("dist"));
    }

    #[test]
    fn missing_addon_dir_errors() {
        let temp = TempDir::new().unwrap();
        let result = BuildContext::new(&temp.path().join("nope"), &PackConfig::default());
        assert!(result.is_err());
    }
}
