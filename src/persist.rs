//! Disk I/O helpers: best-effort load and atomic write.
//!
//! Rename-over is close to atomic on mainstream filesystems; on FAT32 or
//! network shares there are no hard guarantees. Keep backups if a torn file
//! would actually hurt you.

use crate::codec;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::Mapping;
use std::path::Path;

/// Read and decode the file at `path`. A missing or empty file is the normal
/// first-run case and yields an empty mapping. Malformed content also yields
/// an empty mapping, with a logged warning: persistence faults never take
/// down the in-memory view.
pub fn read(path: &Path, format: Format) -> Mapping {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("file {} does not exist yet, starting empty", path.display());
            return Mapping::new();
        }
        Err(e) => {
            log::warn!("cannot read {}: {e}; starting empty", path.display());
            return Mapping::new();
        }
    };
    if bytes.is_empty() {
        return Mapping::new();
    }
    match codec::decode(format, &bytes) {
        Ok(map) => map,
        Err(e) => {
            log::warn!(
                "cannot decode {} as {format}: {e}; starting empty",
                path.display()
            );
            Mapping::new()
        }
    }
}

/// Encode the whole mapping and write it to `path`.
pub fn write(path: &Path, format: Format, map: &Mapping) -> Result<()> {
    let bytes = codec::encode(format, map)?;
    atomic_write(path, &bytes)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    };
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}
