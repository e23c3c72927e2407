//! Bundle assembly: copying source trees into the build directory and
//! naming the resulting archive.

mod assembler;
mod naming;

pub use assembler::{BundleAssembler, CopyOutcome, ExclusionFilter};
pub use naming::{ARCHIVE_EXTENSION, archive_file_name};
