//! Filtered recursive copy of add-on source trees into the build directory.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::PackError;

/// Decides which entries are left out of a bundle.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    names: HashSet<String>,
    extensions: Vec<String>,
}

impl ExclusionFilter {
    /// `names` match an entry's basename exactly; `extensions` are given
    /// without the dot and match case-insensitively.
    pub fn new<N, E>(names: N, extensions: E) -> Self
    where
        N: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            names: names.into_iter().collect(),
            extensions: extensions
                .into_iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn includes(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        if self.names.contains(name) {
            return false;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => !self.extensions.contains(&ext.to_ascii_lowercase()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { files: usize },
    /// The source directory does not exist; nothing was written.
    SourceMissing,
}

#[derive(Debug, Clone)]
pub struct BundleAssembler {
    filter: ExclusionFilter,
    skipped: Vec<PathBuf>,
}

impl BundleAssembler {
    pub fn new(filter: ExclusionFilter) -> Self {
        Self {
            filter,
            skipped: Vec::new(),
        }
    }

    /// Never descend into `path`, wherever it appears under a copied source.
    pub fn skipping(mut self, path: impl Into<PathBuf>) -> Self {
        self.skipped.push(path.into());
        self
    }

    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    /// Copy `src` into `dst`, preserving structure and dropping excluded entries.
    ///
    /// A missing `src` is reported as [`CopyOutcome::SourceMissing`]; any
    /// other filesystem error is a [`PackError::Copy`].
    pub fn copy(&self, src: &Path, dst: &Path) -> anyhow::Result<CopyOutcome> {
        match std::fs::metadata(src) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(copy_error(
                    src,
                    dst,
                    io::Error::other("source is not a directory"),
                ));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(CopyOutcome::SourceMissing);
            }
            Err(err) => return Err(copy_error(src, dst, err)),
        }

        std::fs::create_dir_all(dst).map_err(|e| copy_error(src, dst, e))?;

        let walker = WalkDir::new(src)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            // Never descend into the destination when it lives inside the source.
            .filter_entry(|entry| {
                let path = entry.path();
                path != dst
                    && !self.skipped.iter().any(|skip| path == skip.as_path())
                    && self.filter.includes(path)
            });

        let mut files = 0;
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.into());
                copy_error(&path, dst, io::Error::from(e))
            })?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| anyhow::anyhow!("Walked outside of {}: {}", src.display(), e))?;
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target).map_err(|e| copy_error(entry.path(), &target, e))?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| copy_error(entry.path(), &target, e))?;
                files += 1;
            }
        }

        tracing::debug!(src = %src.display(), dst = %dst.display(), files, "Copied tree");
        Ok(CopyOutcome::Copied { files })
    }
}

fn copy_error(from: &Path, to: &Path, source: io::Error) -> anyhow::Error {
    PackError::Copy {
        from: PathBuf::from(from),
        to: PathBuf::from(to),
        source,
    }
    .into()
}
