//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Abstraction over the file operations the scanner, document store and CLI need
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Creates or truncates `path`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Reads `path` if it is a file, `None` when it does not exist.
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        if self.is_file(path) {
            self.read_to_string(path).map(Some)
        } else {
            Ok(None)
        }
    }
}
