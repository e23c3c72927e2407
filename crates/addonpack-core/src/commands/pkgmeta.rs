//! Package metadata command: record resolved dependencies as externals.

use std::path::PathBuf;

use super::CommandContext;
use crate::git::SourceControl;
use crate::pins::{PackageMetaReport, generate_package_meta};

#[derive(Debug, Clone)]
pub struct PackageMetaOptions {
    pub addon_dir: PathBuf,
}

impl PackageMetaOptions {
    pub fn new(addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageMetaCommand {
    context: CommandContext,
}

impl PackageMetaCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn execute(&self, options: &PackageMetaOptions) -> anyhow::Result<PackageMetaReport> {
        let ctx = self.context.build_context(&options.addon_dir)?;
        let git = ctx.source_control();
        generate_package_meta(&ctx, &git)
    }

    pub fn execute_with(
        &self,
        options: &PackageMetaOptions,
        source_control: &dyn SourceControl,
    ) -> anyhow::Result<PackageMetaReport> {
        let ctx = self.context.build_context(&options.addon_dir)?;
        generate_package_meta(&ctx, source_control)
    }
}
