//! Sync command: pin library dependencies into `.pkgmeta` and manifests.

use std::path::PathBuf;

use super::CommandContext;
use crate::git::SourceControl;
use crate::pins::{DependencyPinSynchronizer, SyncReport};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub addon_dir: PathBuf,
}

impl SyncOptions {
    pub fn new(addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncCommand {
    context: CommandContext,
}

impl SyncCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Synchronize using the configured `git` program.
    pub fn execute(&self, options: &SyncOptions) -> anyhow::Result<SyncReport> {
        let ctx = self.context.build_context(&options.addon_dir)?;
        let git = ctx.source_control();
        DependencyPinSynchronizer::new(&ctx, &git).sync()
    }

    pub fn execute_with(
        &self,
        options: &SyncOptions,
        source_control: &dyn SourceControl,
    ) -> anyhow::Result<SyncReport> {
        let ctx = self.context.build_context(&options.addon_dir)?;
        DependencyPinSynchronizer::new(&ctx, source_control).sync()
    }
}
