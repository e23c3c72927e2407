//! Build command implementation.
//!
//! Packages an add-on with its resolved sibling dependencies into a
//! versioned archive next to the build directory.

use std::path::PathBuf;

use super::CommandContext;
use crate::archive::ArchiverKind;
use crate::orchestration::{PackageReport, PackagingOrchestrator};

/// Options for the build command
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Add-on directory (its basename is the add-on name)
    pub addon_dir: PathBuf,
    /// Archiver override
    pub archiver: Option<ArchiverKind>,
    /// Build root override, taking the place of `build.output_dir`
    pub output_dir: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new(addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
            archiver: None,
            output_dir: None,
        }
    }

    pub fn with_archiver(mut self, archiver: ArchiverKind) -> Self {
        self.archiver = Some(archiver);
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct BuildCommand {
    context: CommandContext,
}

impl BuildCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn execute(&self, options: &BuildOptions) -> anyhow::Result<PackageReport> {
        let mut ctx = self.context.build_context(&options.addon_dir)?;
        if let Some(archiver) = options.archiver {
            ctx = ctx.with_archiver(archiver);
        }
        if let Some(output_dir) = &options.output_dir {
            ctx = ctx.with_build_root(output_dir);
        }

        PackagingOrchestrator::new(ctx).package()
    }
}
