// src/icon/mod.rs

//! Status icon selection and ownership.
//!
//! - [`resolver`] picks the icon from an ordered list of candidates.
//! - [`file`] is the portable backend: it vets icon files through the
//!   [`FileSystem`](crate::fs::FileSystem) abstraction without decoding them.
//! - [`win32`] loads and extracts real `HICON`s (Windows only).
//!
//! An [`Icon`] is either owned (allocated by a backend, released exactly once
//! on teardown) or the built-in system default, which is never released.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::Result;
use crate::fs::FileSystem;

pub mod file;
pub mod resolver;
#[cfg(windows)]
pub mod win32;

pub use file::FileIconBackend;
pub use resolver::IconResolver;

/// Where an owned icon came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOrigin {
    /// A standalone `.ico` file loaded directly.
    IconFile(PathBuf),
    /// The icon associated with some file (executable, shortcut, document).
    Associated(PathBuf),
}

impl IconOrigin {
    pub fn path(&self) -> &Path {
        match self {
            IconOrigin::IconFile(p) | IconOrigin::Associated(p) => p,
        }
    }
}

/// A backend-allocated icon. Not `Clone`: the handle is released by moving it
/// into [`IconBackend::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct IconHandle {
    raw: isize,
    origin: IconOrigin,
}

impl IconHandle {
    pub fn new(raw: isize, origin: IconOrigin) -> Self {
        Self { raw, origin }
    }

    /// Backend-specific handle value (an `HICON` on Windows).
    pub fn raw(&self) -> isize {
        self.raw
    }

    pub fn origin(&self) -> &IconOrigin {
        &self.origin
    }
}

/// The icon shown by the status surface.
#[derive(Debug, PartialEq, Eq)]
pub enum Icon {
    Owned(IconHandle),
    Builtin,
}

impl Icon {
    pub fn is_owned(&self) -> bool {
        matches!(self, Icon::Owned(_))
    }

    pub fn origin(&self) -> Option<&IconOrigin> {
        match self {
            Icon::Owned(handle) => Some(handle.origin()),
            Icon::Builtin => None,
        }
    }

    /// Give an owned handle back to its backend. The built-in icon is left
    /// alone. Consumes `self`, so a handle cannot be released twice.
    pub fn release(self, backend: &dyn IconBackend) {
        if let Icon::Owned(handle) = self {
            backend.release(handle);
        }
    }
}

/// Allocates and frees icons. Every method may fail; the resolver falls
/// through to the next candidate when it does.
pub trait IconBackend: Send + Sync + Debug {
    /// Load a standalone icon image.
    fn load_icon_file(&self, path: &Path) -> Result<IconHandle>;

    /// Extract the icon the shell associates with `path`.
    fn extract_associated(&self, path: &Path) -> Result<IconHandle>;

    fn release(&self, handle: IconHandle);
}

/// The icon backend for the current platform.
pub fn platform_backend(fs: Arc<dyn FileSystem>) -> Arc<dyn IconBackend> {
    #[cfg(windows)]
    {
        let _ = fs;
        Arc::new(win32::Win32IconBackend)
    }
    #[cfg(not(windows))]
    {
        Arc::new(FileIconBackend::new(fs))
    }
}
