//! VFS operations trait.
//!
//! The command layer drives every backend through this trait. Paths are
//! plain `/`-separated strings, absolute or relative to the backend's
//! current directory.

use super::VfsResult;
use super::types::{Content, DirEntry, Touched};

/// Core VFS operations trait.
///
/// Operations are synchronous and run to completion; a backend is owned by
/// a single session.
pub trait VfsOps {
    // ========================================================================
    // Navigation
    // ========================================================================

    /// The current directory, as a normalized absolute path.
    fn current_path(&self) -> String;

    /// List a directory in the backend's natural order.
    ///
    /// `"."` is the current directory.
    fn list_directory(&self, path: &str) -> VfsResult<Vec<DirEntry>>;

    /// Change the current directory.
    ///
    /// On failure the current directory is left untouched.
    fn change_directory(&mut self, path: &str) -> VfsResult<()>;

    // ========================================================================
    // Files
    // ========================================================================

    /// Read a file's content.
    fn read_file(&self, path: &str) -> VfsResult<Content>;

    /// Create a file, or touch an existing one.
    ///
    /// With `display_time`, an existing file is left alone and its
    /// timestamps are reported instead.
    fn create_file(&mut self, path: &str, content: &str, display_time: bool) -> VfsResult<Touched>;

    /// Remove a file. Directories are never removed.
    fn remove_file(&mut self, path: &str) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns true if this backend refuses mutations.
    fn read_only(&self) -> bool;

    /// Convenience: touch with empty content and no time display.
    fn touch(&mut self, path: &str) -> VfsResult<Touched> {
        self.create_file(path, "", false)
    }
}
