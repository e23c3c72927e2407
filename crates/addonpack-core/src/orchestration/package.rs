//! Build pipeline: clean, resolve, assemble, name, guard, archive.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::archive::Archiver;
use crate::bundle::{BundleAssembler, CopyOutcome, archive_file_name};
use crate::context::BuildContext;
use crate::error::PackError;
use crate::fs::hash_file;
use crate::manifest::TocManifest;
use crate::resolver::DependencyGraphResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Written { path: PathBuf, digest: String },
    /// The target archive already existed and was left untouched.
    Collision { path: PathBuf },
}

impl ArchiveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path, .. } | Self::Collision { path } => path,
        }
    }

    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PackageReport {
    pub addon_name: String,
    pub version: String,
    pub build_dir: PathBuf,
    /// Dependencies copied into the bundle, in resolution order
    pub bundled: Vec<String>,
    pub warnings: Vec<String>,
    pub archive: ArchiveOutcome,
}

#[derive(Debug)]
pub struct PackagingOrchestrator {
    ctx: BuildContext,
    assembler: BundleAssembler,
    archiver: Box<dyn Archiver>,
}

impl PackagingOrchestrator {
    pub fn new(ctx: BuildContext) -> Self {
        let assembler = BundleAssembler::new(ctx.exclusion_filter()).skipping(ctx.build_root());
        let archiver = ctx.archiver();
        Self {
            ctx,
            assembler,
            archiver,
        }
    }

    pub fn with_archiver(mut self, archiver: Box<dyn Archiver>) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn package(&self) -> anyhow::Result<PackageReport> {
        let addon_name = self.ctx.addon_name().to_string();
        let build_dir = self.ctx.build_dir();
        tracing::info!(addon = %addon_name, build_dir = %build_dir.display(), "Packaging add-on");

        reset_dir(&build_dir)?;

        let resolved = DependencyGraphResolver::new(self.ctx.addons_root())
            .resolve(&self.ctx.manifest_path())?;
        let mut warnings = resolved.warnings.clone();

        let mut bundled = Vec::new();
        for dependency in &resolved.dependencies {
            match self
                .assembler
                .copy(&dependency.source_path, &build_dir.join(&dependency.name))?
            {
                CopyOutcome::Copied { files } => {
                    tracing::debug!(dependency = %dependency.name, files, "Bundled dependency");
                    bundled.push(dependency.name.clone());
                }
                CopyOutcome::SourceMissing => {
                    tracing::debug!(dependency = %dependency.name, "Dependency source vanished");
                }
            }
        }

        let addon_target = build_dir.join(&addon_name);
        if self.assembler.copy(self.ctx.addon_root(), &addon_target)? == CopyOutcome::SourceMissing {
            anyhow::bail!(
                "Add-on directory disappeared: {}",
                self.ctx.addon_root().display()
            );
        }

        let version = TocManifest::load(&self.ctx.manifest_path())?.version();
        let output = self.ctx.output_path(&archive_file_name(&addon_name, &version));

        let archive = self.write_archive(&build_dir, output, &mut warnings)?;

        Ok(PackageReport {
            addon_name,
            version,
            build_dir,
            bundled,
            warnings,
            archive,
        })
    }

    /// Archive the build directory unless the target already exists.
    fn write_archive(
        &self,
        build_dir: &Path,
        output: PathBuf,
        warnings: &mut Vec<String>,
    ) -> anyhow::Result<ArchiveOutcome> {
        if output.exists() {
            return Ok(collision(output, warnings));
        }

        if let Err(err) = self.archiver.archive(build_dir, &output) {
            if matches!(
                err.downcast_ref::<PackError>(),
                Some(PackError::OutputCollision { .. })
            ) {
                return Ok(collision(output, warnings));
            }
            return Err(err);
        }

        let digest = hash_file(&output)?;
        tracing::info!(archive = %output.display(), %digest, "Wrote archive");
        Ok(ArchiveOutcome::Written {
            path: output,
            digest,
        })
    }
}

fn collision(path: PathBuf, warnings: &mut Vec<String>) -> ArchiveOutcome {
    let message = PackError::OutputCollision { path: path.clone() }.to_string();
    tracing::debug!(archive = %path.display(), "Archive already exists");
    warnings.push(message);
    ArchiveOutcome::Collision { path }
}

/// Remove `dir` with everything in it and recreate it empty.
fn reset_dir(dir: &Path) -> anyhow::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to clear build directory: {}", dir.display()));
        }
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create build directory: {}", dir.display()))
}
