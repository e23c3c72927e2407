//! High-level commands for addonpack operations.
//!
//! Each command takes an options value naming the add-on directory and
//! returns a report; frontends decide how to render it.

pub mod build;
pub mod config;
pub mod context;
pub mod pkgmeta;
pub mod resolve;
pub mod sync;

pub use build::{BuildCommand, BuildOptions};
pub use config::{ConfigCommand, ConfigOptions, ConfigReport};
pub use context::CommandContext;
pub use pkgmeta::{PackageMetaCommand, PackageMetaOptions};
pub use resolve::{ResolveCommand, ResolveOptions};
pub use sync::{SyncCommand, SyncOptions};
