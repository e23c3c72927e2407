//! End-to-end packaging of one add-on into a distributable archive.

pub mod package;

pub use package::{ArchiveOutcome, PackageReport, PackagingOrchestrator};
