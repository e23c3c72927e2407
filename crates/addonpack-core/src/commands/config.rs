//! Config command: show the effective settings, or write them out as the
//! add-on's own `addonpack.toml`.

use std::path::PathBuf;

use super::CommandContext;
use crate::config::{ConfigStore, PackConfig, to_toml};

#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub addon_dir: PathBuf,
    /// Write the effective settings to the project file if it is absent
    pub init: bool,
}

impl ConfigOptions {
    pub fn new(addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
            init: false,
        }
    }

    pub fn with_init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigReport {
    pub global_path: PathBuf,
    pub project_path: PathBuf,
    /// Every setting, defaults included
    pub effective: PackConfig,
    pub toml: String,
    /// Whether the project file was written by this run
    pub written: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigCommand {
    context: CommandContext,
}

impl ConfigCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn execute(&self, options: &ConfigOptions) -> anyhow::Result<ConfigReport> {
        let store = ConfigStore::from_paths(
            self.context.global_config_dir().to_path_buf(),
            options.addon_dir.clone(),
        );
        let merged = store.load()?;
        let effective = PackConfig::from_settings(&merged.build_settings(), &merged.sync_settings());
        let toml = to_toml(&effective)?;

        let mut written = false;
        if options.init {
            if store.project_path().exists() {
                anyhow::bail!(
                    "{} already exists; edit it instead",
                    store.project_path().display()
                );
            }
            store.save_project(&effective)?;
            tracing::info!(path = %store.project_path().display(), "Wrote project config");
            written = true;
        }

        Ok(ConfigReport {
            global_path: store.global_path().to_path_buf(),
            project_path: store.project_path().to_path_buf(),
            effective,
            toml,
            written,
        })
    }
}
