//! Filesystem helpers shared by the loader and the launcher.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Maximum allowed ROM size for reading into memory.
pub const MAX_ROM_BYTES: u64 = 8 * 1024 * 1024; // 8 MiB, largest MBC5 cartridge
/// Maximum allowed manifest size.
pub const MAX_MANIFEST_BYTES: u64 = 64 * 1024; // 64 KiB

/// Read a local resource, config or manifest file, refusing anything over `max_bytes`.
///
/// The size is checked from metadata before any bytes are read.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Cannot open {}", path.display()))?
        .len();
    if len > max_bytes {
        bail!(
            "{} is {} bytes, over the {} byte limit",
            path.display(),
            len,
            max_bytes
        );
    }

    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    // The file may have grown since the metadata call.
    if bytes.len() as u64 > max_bytes {
        bail!("{} grew past the {} byte limit", path.display(), max_bytes);
    }
    Ok(bytes)
}
