//! Host filesystem backend.
//!
//! Read-only passthrough to the real filesystem: list, change directory,
//! read. The current directory is a field of the backend; the process
//! working directory is read once at construction and never changed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{VfsError, VfsResult};
use crate::ops::VfsOps;
use crate::types::{Content, DirEntry, FileType, Touched};

/// Read-only view of the host filesystem.
#[derive(Debug, Clone)]
pub struct HostFs {
    cwd: PathBuf,
}

impl Default for HostFs {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFs {
    /// Start in the process working directory, or `/` if it is unavailable.
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::with_cwd(cwd)
    }

    /// Start in `cwd`.
    ///
    /// The path is canonicalized at construction time to handle symlinks
    /// (e.g. macOS `/tmp` → `/private/tmp`).
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        let cwd: PathBuf = cwd.into();
        let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
        Self { cwd }
    }

    /// The current directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve `path` against the current directory.
    ///
    /// `~` is expanded; `..` and symlinks are resolved by canonicalizing.
    fn resolve(&self, path: &str) -> VfsResult<PathBuf> {
        let expanded = shellexpand::tilde(path);
        let full = self.cwd.join(expanded.as_ref());
        dunce::canonicalize(&full).map_err(|e| io_error(e, path))
    }
}

fn io_error(e: io::Error, path: &str) -> VfsError {
    match e.kind() {
        io::ErrorKind::NotFound => VfsError::not_found(path),
        io::ErrorKind::NotADirectory => VfsError::not_a_directory(path),
        _ => VfsError::Io(e),
    }
}

impl VfsOps for HostFs {
    fn current_path(&self) -> String {
        self.cwd.display().to_string()
    }

    /// Like `ls`, a file operand lists as itself, named as given.
    fn list_directory(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let full = self.resolve(path)?;
        if full.is_file() {
            return Ok(vec![DirEntry::file(path)]);
        }
        if !full.is_dir() {
            return Err(VfsError::not_a_directory(path));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&full).map_err(|e| io_error(e, path))? {
            let entry = entry.map_err(VfsError::from)?;
            let kind = if entry.path().is_dir() {
                FileType::Directory
            } else {
                FileType::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn change_directory(&mut self, path: &str) -> VfsResult<()> {
        let full = self.resolve(path)?;
        if !full.is_dir() {
            return Err(VfsError::not_a_directory(path));
        }
        tracing::debug!(from = %self.cwd.display(), to = %full.display(), "host change directory");
        self.cwd = full;
        Ok(())
    }

    fn read_file(&self, path: &str) -> VfsResult<Content> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            return Err(VfsError::is_a_directory(path));
        }
        let bytes = fs::read(&full).map_err(|e| io_error(e, path))?;
        Ok(Content::from_bytes(bytes))
    }

    fn create_file(&mut self, _path: &str, _content: &str, _display_time: bool) -> VfsResult<Touched> {
        Err(VfsError::ReadOnly)
    }

    fn remove_file(&mut self, _path: &str) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }

    fn read_only(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HostFs) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("b.txt"), "bee").unwrap();
        fs::write(tmp.path().join("a.bin"), [0xffu8, 0xfe]).unwrap();
        let host = HostFs::with_cwd(tmp.path());
        (tmp, host)
    }

    #[test]
    fn test_list_sorted() {
        let (_tmp, host) = setup();
        let entries = host.list_directory(".").unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry::file("a.bin"),
                DirEntry::file("b.txt"),
                DirEntry::directory("sub"),
            ]
        );
    }

    #[test]
    fn test_list_file_operand() {
        let (_tmp, host) = setup();
        assert_eq!(host.list_directory("b.txt").unwrap(), vec![DirEntry::file("b.txt")]);
        assert_eq!(
            host.list_directory("sub/../a.bin").unwrap(),
            vec![DirEntry::file("sub/../a.bin")]
        );
        assert!(matches!(host.list_directory("nope"), Err(VfsError::NotFound(_))));
    }

    #[test]
    fn test_read_text_and_binary() {
        let (_tmp, host) = setup();
        assert_eq!(host.read_file("b.txt").unwrap(), Content::Text("bee".into()));
        assert!(host.read_file("a.bin").unwrap().is_binary());
        assert!(matches!(host.read_file("sub"), Err(VfsError::IsADirectory(_))));
        assert!(matches!(host.read_file("nope"), Err(VfsError::NotFound(_))));
    }

    #[test]
    fn test_change_directory() {
        let (tmp, mut host) = setup();
        host.change_directory("sub").unwrap();
        assert!(host.cwd().ends_with("sub"));

        host.change_directory("..").unwrap();
        assert_eq!(host.cwd(), dunce::canonicalize(tmp.path()).unwrap());

        let before = host.current_path();
        assert!(host.change_directory("b.txt").is_err());
        assert!(host.change_directory("missing").is_err());
        assert_eq!(host.current_path(), before);
    }

    #[test]
    fn test_mutations_refused() {
        let (_tmp, mut host) = setup();
        assert!(host.read_only());
        assert!(matches!(host.touch("new.txt"), Err(VfsError::ReadOnly)));
        assert!(matches!(host.remove_file("b.txt"), Err(VfsError::ReadOnly)));
        assert!(host.read_file("b.txt").is_ok());
    }
}
