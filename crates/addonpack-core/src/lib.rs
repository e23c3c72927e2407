//! addonpack Core Library
//!
//! Provides the domain logic for packaging game-client add-ons:
//! dependency graph resolution over TOC manifests, bundle assembly,
//! archiving, and pinning library dependencies to source-control tags.

pub mod archive;
pub mod bundle;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod orchestration;
pub mod pins;
pub mod resolver;

/// Re-exports of commonly used types
pub mod prelude {
    // Context and configuration
    pub use crate::config::{BuildSettings, ConfigStore, PackConfig, SyncSettings};
    pub use crate::context::BuildContext;
    pub use crate::error::PackError;

    // Manifest
    pub use crate::manifest::TocManifest;

    // Resolution and packaging
    pub use crate::archive::{Archiver, ArchiverKind, CommandArchiver, ZipArchiver};
    pub use crate::bundle::{BundleAssembler, CopyOutcome, ExclusionFilter, archive_file_name};
    pub use crate::orchestration::{ArchiveOutcome, PackageReport, PackagingOrchestrator};
    pub use crate::resolver::{
        DependencyGraph, DependencyGraphResolver, DependencyRecord, ResolveReport,
    };

    // Source control and pins
    pub use crate::git::{GitCli, RemoteDirection, RemoteEntry, SourceControl};
    pub use crate::pins::{
        DependencyPinSynchronizer, ExternalSource, PackageMetaDocument, PackageMetaReport,
        PinDescriptor, PinRecord, SyncReport, generate_package_meta,
    };

    // Commands
    pub use crate::commands::{
        BuildCommand, BuildOptions, CommandContext, PackageMetaCommand, PackageMetaOptions,
        ResolveCommand, ResolveOptions, SyncCommand, SyncOptions,
    };
}
