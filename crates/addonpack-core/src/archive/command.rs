//! Archiver backed by an external 7-Zip executable.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;

use super::Archiver;
use crate::error::PackError;

#[derive(Debug, Clone)]
pub struct CommandArchiver {
    program: String,
}

impl CommandArchiver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandArchiver {
    fn default() -> Self {
        Self::new("7z")
    }
}

impl Archiver for CommandArchiver {
    /// Runs `7z a -tzip <output> *` inside `source_dir`.
    fn archive(&self, source_dir: &Path, output: &Path) -> anyhow::Result<()> {
        // 7z appends to an existing archive instead of failing.
        if output.exists() {
            return Err(PackError::OutputCollision {
                path: PathBuf::from(output),
            }
            .into());
        }

        let output_arg = output
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid archive path: {}", output.display()))?;
        let result = Command::new(&self.program)
            .args(["a", "-tzip", output_arg, "*"])
            .current_dir(source_dir)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            anyhow::bail!(
                "{} failed to create {}: {}",
                self.program,
                output.display(),
                stderr.trim()
            );
        }
        Ok(())
    }
}
