//! Built-in zip archiver.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::Archiver;
use crate::error::PackError;

#[derive(Debug, Clone, Default)]
pub struct ZipArchiver {
    compression: Option<CompressionMethod>,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store entries without compression.
    pub fn stored() -> Self {
        Self {
            compression: Some(CompressionMethod::Stored),
        }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression.unwrap_or(CompressionMethod::Deflated))
    }

    fn write_entries(&self, source_dir: &Path, file: File) -> anyhow::Result<()> {
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = self.options();

        for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in: {}", source_dir.display())
            })?;
            let name = entry_name(source_dir, entry.path())?;

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{name}/"), options)
                    .with_context(|| format!("Failed to add directory to archive: {name}"))?;
            } else {
                zip.start_file(name.as_str(), options)
                    .with_context(|| format!("Failed to add file to archive: {name}"))?;
                let mut input = File::open(entry.path()).with_context(|| {
                    format!("Failed to open file: {}", entry.path().display())
                })?;
                io::copy(&mut input, &mut zip)
                    .with_context(|| format!("Failed to write archive entry: {name}"))?;
            }
        }

        let mut writer = zip.finish().context("Failed to finish zip archive")?;
        writer.flush().context("Failed to flush zip archive")?;
        Ok(())
    }
}

impl Archiver for ZipArchiver {
    fn archive(&self, source_dir: &Path, output: &Path) -> anyhow::Result<()> {
        let file = match OpenOptions::new().write(true).create_new(true).open(output) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(PackError::OutputCollision {
                    path: PathBuf::from(output),
                }
                .into());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to create archive: {}", output.display()));
            }
        };

        if let Err(err) = self.write_entries(source_dir, file) {
            let _ = std::fs::remove_file(output);
            return Err(err);
        }
        Ok(())
    }
}

/// Relative, `/`-separated entry name.
fn entry_name(root: &Path, path: &Path) -> anyhow::Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
