//! Config store for loading and saving addonpack.toml layers.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::paths::CONFIG_FILE_NAME;
use super::{PackConfig, merge_configs, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    global_path: PathBuf,
    project_path: PathBuf,
}

impl ConfigStore {
    pub fn from_paths(global_dir: PathBuf, addon_root: PathBuf) -> Self {
        Self {
            global_path: global_dir.join(CONFIG_FILE_NAME),
            project_path: addon_root.join(CONFIG_FILE_NAME),
        }
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Load both layers and merge them. Missing files are not an error.
    pub fn load(&self) -> anyhow::Result<PackConfig> {
        let global = Self::load_layer(&self.global_path)?;
        let project = Self::load_layer(&self.project_path)?;
        if global.is_none() && project.is_none() {
            tracing::debug!("No addonpack.toml found, using defaults");
        }
        Ok(merge_configs(global, project))
    }

    /// Write the project layer.
    pub fn save_project(&self, config: &PackConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config).context("Failed to serialize config to TOML")?;
        std::fs::write(&self.project_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.project_path.display()
            )
        })?;
        Ok(())
    }

    fn load_layer(path: &Path) -> anyhow::Result<Option<PackConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "Loading config layer");
        parser::parse_pack_toml(path).map(Some)
    }
}
