// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem for tests: a flat map of file paths to contents.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    current_exe: Arc<Mutex<Option<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf(), content.into());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.remove(path.as_ref());
    }

    /// Pretend the running program lives at `path`. Unset by default, in
    /// which case `current_exe` fails.
    pub fn set_current_exe(&self, path: impl AsRef<Path>) {
        *self.current_exe.lock().unwrap() = Some(path.as_ref().to_path_buf());
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> Result<Vec<u8>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(content) => Ok(content.iter().take(limit).copied().collect()),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn current_exe(&self) -> Result<PathBuf> {
        self.current_exe
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("no current executable configured"))
    }
}
