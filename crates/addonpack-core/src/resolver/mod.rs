//! Transitive dependency resolution over sibling add-on manifests.
//!
//! Breadth-first: the worklist is a FIFO queue and the visited set is
//! the [`DependencyGraph`] itself. A name is enqueued at most once, so
//! resolution terminates on cyclic declarations and every name is
//! visited exactly once no matter how many add-ons declare it.

mod graph;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::error::PackError;
use crate::manifest::{TocManifest, manifest_path};

pub use graph::DependencyGraph;

/// Resolved location of a dependency's source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub name: String,
    pub source_path: PathBuf,
}

/// Outcome of one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveReport {
    /// Found dependencies in discovery order
    pub dependencies: Vec<DependencyRecord>,
    /// Declared dependencies without a manifest, in discovery order
    pub missing: Vec<String>,
    /// One user-facing message per missing dependency
    pub warnings: Vec<String>,
}

impl ResolveReport {
    pub fn names(&self) -> Vec<&str> {
        self.dependencies.iter().map(|d| d.name.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct DependencyGraphResolver {
    addons_root: PathBuf,
}

impl DependencyGraphResolver {
    /// Resolver looking up dependencies as `<addons_root>/<name>/<name>.toc`.
    pub fn new(addons_root: impl Into<PathBuf>) -> Self {
        Self {
            addons_root: addons_root.into(),
        }
    }

    pub fn addons_root(&self) -> &Path {
        &self.addons_root
    }

    /// Resolve the flat dependency set declared by `root_manifest`.
    ///
    /// A dependency without a manifest is warned about and left out, but
    /// stays visited so it is never looked up again. Unreadable or
    /// malformed manifests abort resolution.
    pub fn resolve(&self, root_manifest: &Path) -> anyhow::Result<ResolveReport> {
        let root = TocManifest::load(root_manifest)?;

        let mut visited = DependencyGraph::new();
        // The add-on itself is always bundled on its own.
        if let Some(root_name) = root_manifest.file_stem().and_then(|s| s.to_str()) {
            visited.insert(root_name);
        }

        let mut queue = VecDeque::new();
        for name in root.dependencies() {
            if visited.insert(&name) {
                queue.push_back(name);
            }
        }

        let mut report = ResolveReport::default();
        while let Some(name) = queue.pop_front() {
            let source_path = self.addons_root.join(&name);
            let dependency_manifest = manifest_path(&source_path, &name);

            if !dependency_manifest.is_file() {
                let warning = PackError::MissingDependency {
                    name: name.clone(),
                    manifest_path: dependency_manifest,
                };
                tracing::debug!(dependency = %name, "Dependency manifest not found");
                report.warnings.push(warning.to_string());
                report.missing.push(name);
                continue;
            }

            let manifest = TocManifest::load(&dependency_manifest)?;
            for nested in manifest.dependencies() {
                if visited.insert(&nested) {
                    tracing::debug!(dependency = %nested, parent = %name, "Discovered dependency");
                    queue.push_back(nested);
                }
            }

            report.dependencies.push(DependencyRecord { name, source_path });
        }

        Ok(report)
    }
}
