//! Error kinds surfaced by packaging and pin synchronization.
//!
//! Operations return `anyhow::Result`; the kinds below are carried inside
//! the `anyhow::Error` so callers can `downcast_ref::<PackError>()`.
//! `MissingDependency` and `OutputCollision` are recovered conditions:
//! they are never returned as errors, only rendered into report warnings.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error(
        "Dependency \"{name}\" has not been found and therefore not been included in the bundle."
    )]
    MissingDependency { name: String, manifest_path: PathBuf },

    #[error(
        "Output file \"{}\" already exists. If you intend to overwrite it, please delete the file manually before running the build again.",
        path.display()
    )]
    OutputCollision { path: PathBuf },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed for {target}: {message}")]
    SourceControl {
        operation: String,
        target: String,
        message: String,
    },

    #[error("Malformed {kind} {}: {message}", path.display())]
    MalformedDocument {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl PackError {
    pub fn source_control(
        operation: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceControl {
            operation: operation.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn malformed(kind: &'static str, path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedDocument {
            kind,
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether the pipeline recovers from this kind locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. } | Self::OutputCollision { .. }
        )
    }
}
