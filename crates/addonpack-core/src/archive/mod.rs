//! Archivers turning a populated build directory into one archive file.

mod command;
mod zip_archiver;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use command::CommandArchiver;
pub use zip_archiver::ZipArchiver;

/// Writes the contents of `source_dir` (not the directory itself) to `output`.
///
/// Implementations must not replace an existing `output`.
pub trait Archiver: std::fmt::Debug {
    fn archive(&self, source_dir: &Path, output: &Path) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiverKind {
    /// Built-in zip writer
    #[default]
    #[serde(rename = "zip")]
    Zip,
    /// External 7-Zip executable
    #[serde(rename = "7z")]
    SevenZip,
}

impl std::str::FromStr for ArchiverKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "7z" | "7zip" | "7-zip" => Ok(Self::SevenZip),
            other => anyhow::bail!("Unknown archiver: {}. Use 'zip' or '7z'", other),
        }
    }
}
