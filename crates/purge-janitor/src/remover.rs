//! Removal seam between sweep planning and the filesystem

use std::fs;
use std::io;
use std::path::Path;

/// Something that can delete a named entry
///
/// The Janitor only decides; implementations perform the deletion. Tests
/// substitute an in-memory recorder.
pub trait Remover {
    /// Error type for failed removals
    type Error: std::fmt::Display;

    /// Remove the entry called `name`
    fn remove(&mut self, name: &str) -> Result<(), Self::Error>;
}

/// Removes files with `remove_file` and directories recursively
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    type Error = io::Error;

    fn remove(&mut self, name: &str) -> Result<(), Self::Error> {
        let path = Path::new(name);
        // Symlinks are removed themselves, never followed
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}
