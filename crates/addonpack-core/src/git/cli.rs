//! `git` executable backend.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::{RemoteEntry, SourceControl, parse_remote_listing};
use crate::error::PackError;

/// Variables that would redirect git away from the directory we point it at.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::with_program("git")
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        for key in GIT_ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        cmd
    }

    /// Run a git command and return its stdout.
    fn run<I, S>(
        &self,
        cwd: Option<&Path>,
        operation: &str,
        target: &str,
        args: I,
    ) -> anyhow::Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command();
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        tracing::debug!(operation, target, "Running git");

        let output = cmd
            .output()
            .map_err(|e| PackError::source_control(operation, target, e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PackError::source_control(operation, target, stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SourceControl for GitCli {
    fn clone_repository(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        self.run(
            None,
            "clone",
            url,
            [
                OsStr::new("clone"),
                OsStr::new("--quiet"),
                OsStr::new(url),
                dest.as_os_str(),
            ],
        )?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, reference: &str) -> anyhow::Result<()> {
        self.run(
            Some(repo),
            "checkout",
            reference,
            [
                "-c",
                "advice.detachedHead=false",
                "checkout",
                "--quiet",
                reference,
            ],
        )?;
        Ok(())
    }

    fn remotes(&self, repo: &Path) -> anyhow::Result<Vec<RemoteEntry>> {
        let target = repo.display().to_string();
        let stdout = self.run(Some(repo), "remote", &target, ["remote", "-v"])?;
        Ok(parse_remote_listing(&stdout))
    }
}
