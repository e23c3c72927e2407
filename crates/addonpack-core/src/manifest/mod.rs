//! Add-on manifest (TOC) access.

pub mod toc;

pub use toc::{
    TocLine, TocManifest, manifest_path, prepend_files_to_load, retrieve_addon_name,
    retrieve_dependencies, retrieve_version,
};
