//! Content digests for produced archives.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;

/// blake3 digest of a file's bytes as a 64 character hex string.
///
/// # Example
/// ```no_run
/// use addonpack_core::fs::hash_file;
/// use std::path::Path;
///
/// let digest = hash_file(Path::new("build/MyAddOn_1_0.zip"))?;
/// assert_eq!(digest.len(), 64);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn hash_file(path: &Path) -> anyhow::Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(hasher.finalize().to_hex().to_string())
}
