//! Library dependencies pinned to source-control tags.
//!
//! - [`PinDescriptor`]: the add-on's `.dependencies` file
//! - [`PackageMetaDocument`]: the packager's `.pkgmeta` file
//! - [`DependencyPinSynchronizer`]: transitive pin discovery and rewriting
//! - [`generate_package_meta`]: `.pkgmeta` externals from sibling checkouts

mod descriptor;
mod generate;
mod package_meta;
mod sync;

pub use descriptor::{PinDescriptor, PinRecord, library_install_path};
pub use generate::{PackageMetaReport, generate_package_meta};
pub use package_meta::{ExternalSource, PackageMetaDocument};
pub use sync::{DependencyPinSynchronizer, SyncReport};
