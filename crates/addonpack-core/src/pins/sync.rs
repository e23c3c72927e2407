//! Pin synchronization: transitive pin discovery through scratch clones,
//! then `.pkgmeta` and manifest rewriting.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{ExternalSource, PackageMetaDocument, PinDescriptor, PinRecord};
use crate::context::BuildContext;
use crate::git::SourceControl;
use crate::manifest::TocManifest;
use crate::resolver::DependencyGraph;

const SCRATCH_PREFIX: &str = "addonpack-";

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Every pin, root descriptor first, then nested pins in discovery order
    pub pins: Vec<PinRecord>,
    pub manifests_updated: Vec<PathBuf>,
    pub package_meta_path: PathBuf,
}

pub struct DependencyPinSynchronizer<'a> {
    ctx: &'a BuildContext,
    source_control: &'a dyn SourceControl,
}

impl<'a> DependencyPinSynchronizer<'a> {
    pub fn new(ctx: &'a BuildContext, source_control: &'a dyn SourceControl) -> Self {
        Self {
            ctx,
            source_control,
        }
    }

    pub fn sync(&self) -> anyhow::Result<SyncReport> {
        let pins = self.discover()?;
        tracing::info!(count = pins.len(), "Discovered pinned dependencies");

        let package_meta_path = self.update_package_meta(&pins)?;
        let manifests_updated = self.update_manifests(&pins)?;

        Ok(SyncReport {
            pins,
            manifests_updated,
            package_meta_path,
        })
    }

    /// Breadth-first walk over the root descriptor and every pinned
    /// revision's own descriptor. Names are visited at most once.
    pub fn discover(&self) -> anyhow::Result<Vec<PinRecord>> {
        let libraries_dir = &self.ctx.sync_settings().libraries_dir;
        let root = PinDescriptor::load(&self.ctx.pin_file_path(), libraries_dir)?;

        let mut seen = DependencyGraph::new();
        let mut queue = VecDeque::new();
        let mut pins = Vec::new();
        for pin in root.pins {
            if seen.insert(&pin.name) {
                queue.push_back(pin.clone());
                pins.push(pin);
            }
        }

        while let Some(pin) = queue.pop_front() {
            for mut nested in self.nested_pins(&pin)? {
                nested.rehome(libraries_dir);
                if seen.insert(&nested.name) {
                    tracing::debug!(pin = %nested.name, parent = %pin.name, "Discovered nested pin");
                    queue.push_back(nested.clone());
                    pins.push(nested);
                }
            }
        }

        Ok(pins)
    }

    /// Pins declared by `pin` at its pinned tag.
    fn nested_pins(&self, pin: &PinRecord) -> anyhow::Result<Vec<PinRecord>> {
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .context("Failed to create scratch directory")?;

        tracing::info!(pin = %pin.name, tag = %pin.tag, "Inspecting pinned revision");
        self.source_control.clone_repository(&pin.url, scratch.path())?;
        self.source_control.checkout(scratch.path(), &pin.tag)?;

        let descriptor_path = scratch.path().join(&self.ctx.sync_settings().pin_file);
        let nested = PinDescriptor::load_optional(
            &descriptor_path,
            &self.ctx.sync_settings().libraries_dir,
        )?;
        Ok(nested.map(|d| d.pins).unwrap_or_default())
    }

    fn update_package_meta(&self, pins: &[PinRecord]) -> anyhow::Result<PathBuf> {
        let path = self.ctx.package_meta_path();
        let mut document = PackageMetaDocument::load_or_new(&path, self.ctx.addon_name())?;
        for pin in pins {
            document.upsert_external(
                &pin.install_path,
                &ExternalSource::new(pin.url.clone(), Some(pin.tag.clone())),
            );
        }
        document.save(&path)?;
        tracing::info!(path = %path.display(), "Updated package metadata");
        Ok(path)
    }

    fn update_manifests(&self, pins: &[PinRecord]) -> anyhow::Result<Vec<PathBuf>> {
        let mut updated = Vec::new();
        for path in self.ctx.manifest_variant_paths() {
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "Manifest variant not present");
                continue;
            }
            if inject_load_directives(&path, pins)? {
                updated.push(path);
            }
        }
        Ok(updated)
    }
}

/// Prepend a load directive for each pin the manifest does not load yet.
///
/// Returns whether the manifest was rewritten.
fn inject_load_directives(path: &Path, pins: &[PinRecord]) -> anyhow::Result<bool> {
    let mut manifest = TocManifest::load(path)?;
    let present: Vec<String> = manifest
        .files_to_load()
        .iter()
        .map(|f| normalize_directive(f))
        .collect();

    let missing: Vec<&str> = pins
        .iter()
        .map(|p| p.install_path.as_str())
        .filter(|p| !present.contains(&normalize_directive(p)))
        .collect();
    if missing.is_empty() {
        return Ok(false);
    }

    manifest.prepend_files_to_load(&missing);
    manifest.save(path)?;
    tracing::info!(path = %path.display(), added = missing.len(), "Updated manifest");
    Ok(true)
}

fn normalize_directive(entry: &str) -> String {
    entry.trim().replace('\\', "/").to_ascii_lowercase()
}
