// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// Only the handful of queries the relay needs to pick icons and resolve
/// executables: existence checks and reading a file header.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// Read at most `limit` bytes from the start of the file.
    fn read_prefix(&self, path: &Path, limit: usize) -> Result<Vec<u8>>;

    /// Path of the running program, used as the last owned icon source.
    fn current_exe(&self) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> Result<Vec<u8>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        let mut buf = Vec::with_capacity(limit);
        file.take(limit as u64)
            .read_to_end(&mut buf)
            .with_context(|| format!("reading file {:?}", path))?;
        Ok(buf)
    }

    fn current_exe(&self) -> Result<PathBuf> {
        std::env::current_exe().context("locating the running executable")
    }
}
