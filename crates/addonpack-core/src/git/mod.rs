//! Source-control access for pin synchronization and metadata generation.
//!
//! - [`SourceControl`]: the narrow capability the pipelines depend on
//! - [`GitCli`]: implementation driving the `git` executable
//! - remote listing parsed into [`RemoteEntry`] rows
//! - origin URL lookup and SSH to HTTPS normalization

mod cli;
mod origin;
mod remote;
mod source_control;
mod url;

pub use cli::GitCli;
pub use origin::{origin_url, resolve_git_dir};
pub use remote::{RemoteDirection, RemoteEntry, origin_fetch_url, parse_remote_listing};
pub use source_control::SourceControl;
pub use url::normalize_github_url;
