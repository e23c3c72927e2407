//! Origin URL discovery for local dependency checkouts.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{SourceControl, normalize_github_url, origin_fetch_url};

/// Directory to run git in for the checkout at `checkout`.
///
/// A submodule checkout has a `.git` file holding `gitdir: <path>` that
/// points into the superproject's module store; that directory is
/// returned. A plain clone returns `checkout` itself.
pub fn resolve_git_dir(checkout: &Path) -> anyhow::Result<PathBuf> {
    let dot_git = checkout.join(".git");
    if dot_git.is_dir() {
        return Ok(checkout.to_path_buf());
    }
    if !dot_git.is_file() {
        anyhow::bail!("Not a git checkout: {}", checkout.display());
    }

    let content = std::fs::read_to_string(&dot_git)
        .with_context(|| format!("Failed to read {}", dot_git.display()))?;
    let pointer = content
        .lines()
        .find_map(|line| line.trim().strip_prefix("gitdir:"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow::anyhow!("No gitdir pointer in {}", dot_git.display()))?;

    Ok(checkout.join(pointer))
}

/// Normalized fetch URL of `origin` for the checkout, if it has one.
pub fn origin_url(
    source_control: &dyn SourceControl,
    checkout: &Path,
) -> anyhow::Result<Option<String>> {
    let git_dir = resolve_git_dir(checkout)?;
    let remotes = source_control.remotes(&git_dir)?;
    Ok(origin_fetch_url(&remotes).map(normalize_github_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{RemoteDirection, RemoteEntry};
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct RecordingRemotes {
        asked: RefCell<Vec<PathBuf>>,
        remotes: Vec<RemoteEntry>,
    }

    impl SourceControl for RecordingRemotes {
        fn clone_repository(&self, _url: &str, _dest: &Path) -> anyhow::Result<()> {
            unreachable!("not used")
        }

        fn checkout(&self, _repo: &Path, _reference: &str) -> anyhow::Result<()> {
            unreachable!("not used")
        }

        fn remotes(&self, repo: &Path) -> anyhow::Result<Vec<RemoteEntry>> {
            self.asked.borrow_mut().push(repo.to_path_buf());
            Ok(self.remotes.clone())
        }
    }

    #[test]
    fn submodule_pointer_is_followed() {
        let temp = TempDir::new().unwrap();
        let checkout = temp.path().join("AddOns").join("LibStub");
        std::fs::create_dir_all(&checkout).unwrap();
        std::fs::write(
            checkout.join(".git"),
            "gitdir: ../../.git/modules/LibStub\n",
        )
        .unwrap();

        let resolved = resolve_git_dir(&checkout).unwrap();
        assert_eq!(resolved, checkout.join("../../.git/modules/LibStub"));
    }

    #[test]
    fn plain_clone_is_its_own_git_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".git")).unwrap();
        assert_eq!(resolve_git_dir(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn non_checkout_errors() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_git_dir(temp.path()).is_err());
    }

    #[test]
    fn origin_url_is_normalized() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".git"), "gitdir: /store/modules/Lib").unwrap();

        let sc = RecordingRemotes {
            remotes: vec![
                RemoteEntry::new("origin", "git@github.com:me/Lib.git", RemoteDirection::Push),
                RemoteEntry::new("origin", "git@github.com:me/Lib.git", RemoteDirection::Fetch),
            ],
            ..Default::default()
        };

        let url = origin_url(&sc, temp.path()).unwrap();
        assert_eq!(url.as_deref(), Some("https://github.com/me/Lib"));
        assert_eq!(*sc.asked.borrow(), vec![PathBuf::from("/store/modules/Lib")]);
    }
}
