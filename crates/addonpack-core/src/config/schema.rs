//! Configuration schema for addonpack.toml
//!
//! A file layer ([`PackConfig`]) keeps every field optional so global and
//! project files can be merged field by field. [`BuildSettings`] and
//! [`SyncSettings`] are the resolved values the pipelines consume.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::ArchiverKind;

/// Root structure of one addonpack.toml layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub sync: SyncSection,
}

/// `[build]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Build root, relative to the add-on directory
    pub output_dir: Option<PathBuf>,

    pub archiver: Option<ArchiverKind>,

    /// Executable used by the `7z` archiver
    pub seven_zip_program: Option<String>,

    /// Entry basenames dropped from bundles
    pub exclude_names: Option<Vec<String>>,

    /// File extensions (without dot) dropped from bundles
    pub exclude_extensions: Option<Vec<String>>,
}

/// `[sync]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Library folder inside the add-on that pinned dependencies live in
    pub libraries_dir: Option<PathBuf>,

    pub pin_file: Option<String>,

    pub package_meta_file: Option<String>,

    /// Manifest suffixes, one per supported client release line
    pub manifest_variants: Option<Vec<String>>,

    /// Executable used for source-control operations
    pub git_program: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub output_dir: PathBuf,
    pub archiver: ArchiverKind,
    pub seven_zip_program: String,
    pub exclude_names: Vec<String>,
    pub exclude_extensions: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("../../build"),
            archiver: ArchiverKind::Zip,
            seven_zip_program: "7z".to_string(),
            exclude_names: [".idea", ".git", ".gitignore", ".gitmodules"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_extensions: vec!["bat".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub libraries_dir: PathBuf,
    pub pin_file: String,
    pub package_meta_file: String,
    pub manifest_variants: Vec<String>,
    pub git_program: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            libraries_dir: PathBuf::from("libs"),
            pin_file: ".dependencies".to_string(),
            package_meta_file: ".pkgmeta".to_string(),
            manifest_variants: vec![
                String::new(),
                "_Wrath".to_string(),
                "_Vanilla".to_string(),
            ],
            git_program: "git".to_string(),
        }
    }
}

impl PackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fully populated layer holding the given resolved settings.
    pub fn from_settings(build: &BuildSettings, sync: &SyncSettings) -> Self {
        Self {
            build: BuildSection {
                output_dir: Some(build.output_dir.clone()),
                archiver: Some(build.archiver),
                seven_zip_program: Some(build.seven_zip_program.clone()),
                exclude_names: Some(build.exclude_names.clone()),
                exclude_extensions: Some(build.exclude_extensions.clone()),
            },
            sync: SyncSection {
                libraries_dir: Some(sync.libraries_dir.clone()),
                pin_file: Some(sync.pin_file.clone()),
                package_meta_file: Some(sync.package_meta_file.clone()),
                manifest_variants: Some(sync.manifest_variants.clone()),
                git_program: Some(sync.git_program.clone()),
            },
        }
    }

    /// Validate a single layer.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(extensions) = &self.build.exclude_extensions {
            for ext in extensions {
                if ext.is_empty() || ext.starts_with('.') {
                    anyhow::bail!(
                        "Invalid exclude extension '{}': use the bare extension, e.g. \"bat\"",
                        ext
                    );
                }
            }
        }
        if let Some(names) = &self.build.exclude_names
            && names.iter().any(|n| n.is_empty() || n.contains(['/', '\\']))
        {
            anyhow::bail!("exclude_names entries must be plain file or directory names");
        }
        if let Some(dir) = &self.sync.libraries_dir {
            ensure_plain_relative(dir)?;
        }
        Ok(())
    }

    /// Resolve the build settings, filling unset fields with defaults.
    pub fn build_settings(&self) -> BuildSettings {
        let defaults = BuildSettings::default();
        let section = &self.build;
        BuildSettings {
            output_dir: section.output_dir.clone().unwrap_or(defaults.output_dir),
            archiver: section.archiver.unwrap_or(defaults.archiver),
            seven_zip_program: section
                .seven_zip_program
                .clone()
                .unwrap_or(defaults.seven_zip_program),
            exclude_names: section
                .exclude_names
                .clone()
                .unwrap_or(defaults.exclude_names),
            exclude_extensions: section
                .exclude_extensions
                .clone()
                .unwrap_or(defaults.exclude_extensions),
        }
    }

    /// Resolve the sync settings, filling unset fields with defaults.
    pub fn sync_settings(&self) -> SyncSettings {
        let defaults = SyncSettings::default();
        let section = &self.sync;
        SyncSettings {
            libraries_dir: section
                .libraries_dir
                .clone()
                .unwrap_or(defaults.libraries_dir),
            pin_file: section.pin_file.clone().unwrap_or(defaults.pin_file),
            package_meta_file: section
                .package_meta_file
                .clone()
                .unwrap_or(defaults.package_meta_file),
            manifest_variants: section
                .manifest_variants
                .clone()
                .unwrap_or(defaults.manifest_variants),
            git_program: section.git_program.clone().unwrap_or(defaults.git_program),
        }
    }
}

fn ensure_plain_relative(path: &Path) -> anyhow::Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                anyhow::bail!("libraries_dir must not contain '..': {}", path.display())
            }
            Component::Prefix(_) | Component::RootDir => {
                anyhow::bail!("libraries_dir must be relative: {}", path.display())
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layer_resolves_to_defaults() {
        let config = PackConfig::new();
        assert_eq!(config.build_settings(), BuildSettings::default());
        assert_eq!(config.sync_settings(), SyncSettings::default());
    }

    #[test]
    fn default_exclusions_cover_vcs_and_scripts() {
        let settings = BuildSettings::default();
        assert!(settings.exclude_names.contains(&".git".to_string()));
        assert!(settings.exclude_names.contains(&".gitmodules".to_string()));
        assert_eq!(settings.exclude_extensions, vec!["bat".to_string()]);
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let mut config = PackConfig::new();
        config.build.exclude_extensions = Some(vec![".bat".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(".bat"));
    }

    #[test]
    fn libraries_dir_cannot_escape_addon() {
        let mut config = PackConfig::new();
        config.sync.libraries_dir = Some(PathBuf::from("../shared"));
        assert!(config.validate().is_err());

        config.sync.libraries_dir = Some(PathBuf::from("Libs/Embedded"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_settings_round_trips_through_resolution() {
        let mut sync = SyncSettings::default();
        sync.libraries_dir = PathBuf::from("Libs");
        let config = PackConfig::from_settings(&BuildSettings::default(), &sync);
        assert_eq!(config.build_settings(), BuildSettings::default());
        assert_eq!(config.sync_settings(), sync);
    }
}
