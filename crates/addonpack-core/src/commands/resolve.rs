//! Resolve command: the dependency graph without building anything.

use std::path::PathBuf;

use super::CommandContext;
use crate::resolver::{DependencyGraphResolver, ResolveReport};

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub addon_dir: PathBuf,
}

impl ResolveOptions {
    pub fn new(addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolveCommand {
    context: CommandContext,
}

impl ResolveCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn execute(&self, options: &ResolveOptions) -> anyhow::Result<ResolveReport> {
        let ctx = self.context.build_context(&options.addon_dir)?;
        DependencyGraphResolver::new(ctx.addons_root()).resolve(&ctx.manifest_path())
    }
}
