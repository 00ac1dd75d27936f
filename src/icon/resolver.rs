// src/icon/resolver.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Icon, IconBackend, IconHandle};
use crate::command::CommandSpec;
use crate::errors::{RelayError, Result};
use crate::fs::FileSystem;

/// Candidate icon sources, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    /// `--icon`: an `.ico` file, or any file whose associated icon we use.
    Configured(PathBuf),
    /// The primary command's executable.
    PrimaryExecutable(PathBuf),
    /// The running program itself.
    Program,
}

/// Picks the status icon. Never fails: the worst case is [`Icon::Builtin`].
#[derive(Debug)]
pub struct IconResolver<'a> {
    backend: &'a dyn IconBackend,
    fs: &'a dyn FileSystem,
}

impl<'a> IconResolver<'a> {
    pub fn new(backend: &'a dyn IconBackend, fs: &'a dyn FileSystem) -> Self {
        Self { backend, fs }
    }

    pub fn resolve(&self, icon_path: Option<&Path>, primary_raw: &str) -> Icon {
        for candidate in candidates(icon_path, primary_raw) {
            match self.try_candidate(&candidate) {
                Ok(handle) => {
                    debug!(?candidate, origin = ?handle.origin(), "status icon resolved");
                    return Icon::Owned(handle);
                }
                Err(err) => {
                    debug!(?candidate, error = %err, "icon candidate unusable; trying next");
                }
            }
        }

        debug!("falling back to built-in icon");
        Icon::Builtin
    }

    fn try_candidate(&self, candidate: &Candidate) -> Result<IconHandle> {
        match candidate {
            Candidate::Configured(path) => {
                self.ensure_file(path)?;
                if is_icon_file(path) {
                    self.backend.load_icon_file(path)
                } else {
                    self.backend.extract_associated(path)
                }
            }
            Candidate::PrimaryExecutable(path) => {
                self.ensure_file(path)?;
                self.backend.extract_associated(path)
            }
            Candidate::Program => {
                let exe = self.fs.current_exe()?;
                self.backend.extract_associated(&exe)
            }
        }
    }

    fn ensure_file(&self, path: &Path) -> Result<()> {
        if self.fs.is_file(path) {
            Ok(())
        } else {
            Err(RelayError::icon(path, "file does not exist"))
        }
    }
}

fn candidates(icon_path: Option<&Path>, primary_raw: &str) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(3);
    if let Some(path) = icon_path {
        out.push(Candidate::Configured(path.to_path_buf()));
    }
    let primary = CommandSpec::parse(primary_raw);
    if !primary.executable_path.is_empty() {
        out.push(Candidate::PrimaryExecutable(PathBuf::from(
            primary.executable_path,
        )));
    }
    out.push(Candidate::Program);
    out
}

/// Whether `path` names a standalone icon image (by extension).
pub fn is_icon_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ico"))
}
