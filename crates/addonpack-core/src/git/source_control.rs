use std::path::Path;

use super::RemoteEntry;

/// Blocking clone, checkout and remote listing.
///
/// Failures are reported as `PackError::SourceControl` inside the
/// returned error.
pub trait SourceControl: std::fmt::Debug {
    /// Clone `url` into `dest`, which must be absent or empty.
    fn clone_repository(&self, url: &str, dest: &Path) -> anyhow::Result<()>;

    /// Check out a tag (or any revision) in an existing clone.
    fn checkout(&self, repo: &Path, reference: &str) -> anyhow::Result<()>;

    /// Configured remotes of the repository at `repo`.
    fn remotes(&self, repo: &Path) -> anyhow::Result<Vec<RemoteEntry>>;
}
