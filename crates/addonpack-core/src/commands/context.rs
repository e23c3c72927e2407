//! Configuration loading shared by every command.

use std::path::{Path, PathBuf};

use crate::config::{ConfigStore, global_config_dir};
use crate::context::BuildContext;

/// Where commands look for the user-wide `addonpack.toml`.
#[derive(Debug, Clone)]
pub struct CommandContext {
    global_config_dir: PathBuf,
}

impl CommandContext {
    pub fn new(global_config_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: global_config_dir.into(),
        }
    }

    /// Use the platform config directory.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(global_config_dir()?))
    }

    pub fn global_config_dir(&self) -> &Path {
        &self.global_config_dir
    }

    /// Merge the global and per-add-on config layers for `addon_dir`.
    pub fn build_context(&self, addon_dir: &Path) -> anyhow::Result<BuildContext> {
        let store = ConfigStore::from_paths(self.global_config_dir.clone(), addon_dir.to_path_buf());
        let config = store.load()?;
        BuildContext::new(addon_dir, &config)
    }
}
