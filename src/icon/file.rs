// src/icon/file.rs

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};

use tracing::debug;

use super::{IconBackend, IconHandle, IconOrigin};
use crate::errors::{RelayError, Result};
use crate::fs::FileSystem;

/// ICO header: reserved 0, type 1.
const ICO_MAGIC: [u8; 4] = [0x00, 0x00, 0x01, 0x00];
/// PNG signature (Vista-style icons embed PNG payloads).
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Portable backend: an icon "handle" is a token for a file that was checked
/// to exist (and, for icon files, to carry an icon header). Nothing is
/// decoded; rendering is up to the status surface.
#[derive(Debug)]
pub struct FileIconBackend {
    fs: Arc<dyn FileSystem>,
    next_id: AtomicIsize,
}

impl FileIconBackend {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            next_id: AtomicIsize::new(1),
        }
    }

    fn allocate(&self, origin: IconOrigin) -> IconHandle {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        IconHandle::new(raw, origin)
    }
}

impl IconBackend for FileIconBackend {
    fn load_icon_file(&self, path: &Path) -> Result<IconHandle> {
        let head = self.fs.read_prefix(path, PNG_MAGIC.len())?;
        if !(head.starts_with(&ICO_MAGIC) || head.starts_with(&PNG_MAGIC)) {
            return Err(RelayError::icon(path, "not an icon image"));
        }
        Ok(self.allocate(IconOrigin::IconFile(path.to_path_buf())))
    }

    fn extract_associated(&self, path: &Path) -> Result<IconHandle> {
        if !self.fs.is_file(path) {
            return Err(RelayError::icon(path, "file does not exist"));
        }
        Ok(self.allocate(IconOrigin::Associated(path.to_path_buf())))
    }

    fn release(&self, handle: IconHandle) {
        debug!(raw = handle.raw(), origin = ?handle.origin(), "icon released");
    }
}
