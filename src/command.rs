// src/command.rs

//! Splitting a raw command line into an executable path and its argument
//! string.
//!
//! The same rule is used everywhere a raw command string needs splitting:
//! by the launcher, by the icon resolver (to find the primary's executable)
//! and by the status text (to show the target file names).

use std::fmt;
use std::path::Path;

/// An executable path plus the (unparsed) argument string that goes with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub executable_path: String,
    pub arguments: String,
}

impl CommandSpec {
    pub fn new(executable_path: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            executable_path: executable_path.into(),
            arguments: arguments.into(),
        }
    }

    /// Split `raw` into path and arguments.
    ///
    /// - `"C:\Program Files\x.exe" -a b` → path `C:\Program Files\x.exe`,
    ///   arguments `-a b`.
    /// - `x.exe -a b` → path `x.exe`, arguments `-a b`.
    /// - No closing quote, or no space: the whole trimmed string is the path.
    ///
    /// Never fails. Whether the path exists is the launcher's business.
    pub fn parse(raw: &str) -> Self {
        let command = raw.trim();

        if let Some(rest) = command.strip_prefix('"') {
            return match rest.find('"') {
                Some(end) => Self::new(&rest[..end], rest[end + 1..].trim()),
                None => Self::new(command, ""),
            };
        }

        match command.find(' ') {
            Some(space) => Self::new(&command[..space], command[space + 1..].trim()),
            None => Self::new(command, ""),
        }
    }

    pub fn executable(&self) -> &Path {
        Path::new(&self.executable_path)
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Last component of the executable path, accepting both `/` and `\`
    /// as separators so Windows-style paths display the same everywhere.
    pub fn file_name(&self) -> &str {
        self.executable_path
            .rsplit(['/', '\\'])
            .find(|part| !part.is_empty())
            .unwrap_or(&self.executable_path)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.executable_path.contains(' ') {
            write!(f, "\"{}\"", self.executable_path)?;
        } else {
            f.write_str(&self.executable_path)?;
        }
        if self.has_arguments() {
            write!(f, " {}", self.arguments)?;
        }
        Ok(())
    }
}
