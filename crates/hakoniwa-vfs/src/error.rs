//! VFS error types.

use std::io;
use thiserror::Error;

/// The failure taxonomy, without the message.
///
/// The string form is the taxonomy name, e.g. `"PathEscapesRoot"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum ErrorKind {
    NotFound,
    NotADirectory,
    IsADirectory,
    PathEscapesRoot,
    NameCollision,
    ArchiveLoadError,
    ReadOnly,
    Io,
}

/// VFS error type.
///
/// Each variant carries a message that is ready to print. Use the
/// constructors below rather than building variants by hand so the wording
/// stays consistent across operations.
#[derive(Debug, Error)]
pub enum VfsError {
    /// A path component or the target itself does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A non-terminal segment names a file.
    #[error("{0}")]
    NotADirectory(String),

    /// The operation expected a file.
    #[error("{0}")]
    IsADirectory(String),

    /// A `..` segment tried to ascend above the root.
    #[error("{0}")]
    PathEscapesRoot(String),

    /// The create target exists with an incompatible type.
    #[error("{0}")]
    NameCollision(String),

    /// The import source is missing, unreadable or malformed.
    #[error("archive load error: {0}")]
    ArchiveLoad(String),

    /// The backend does not accept mutations.
    #[error("filesystem is read-only")]
    ReadOnly,

    /// I/O error from the host backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl VfsError {
    /// Create a NotFound error for a missing path.
    pub fn not_found(path: impl AsRef<str>) -> Self {
        Self::NotFound(format!("no such file or directory: {}", path.as_ref()))
    }

    /// Create a NotFound error for a missing parent directory.
    pub fn no_such_directory(path: impl AsRef<str>) -> Self {
        Self::NotFound(format!("no such directory: {}", path.as_ref()))
    }

    /// Create a NotFound error for a missing file.
    pub fn no_such_file(path: impl AsRef<str>) -> Self {
        Self::NotFound(format!("no such file: {}", path.as_ref()))
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl AsRef<str>) -> Self {
        Self::NotADirectory(format!("not a directory: {}", path.as_ref()))
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl AsRef<str>) -> Self {
        Self::IsADirectory(format!("is a directory: {}", path.as_ref()))
    }

    /// Create the IsADirectory error reported by `remove_file`.
    pub fn cannot_remove_directory(path: impl AsRef<str>) -> Self {
        Self::IsADirectory(format!(
            "cannot remove, it is a directory: {}",
            path.as_ref()
        ))
    }

    /// Create a PathEscapesRoot error.
    pub fn path_escapes_root(path: impl AsRef<str>) -> Self {
        Self::PathEscapesRoot(format!("path escapes root: {}", path.as_ref()))
    }

    /// Create the NameCollision error reported by `create_file`.
    pub fn directory_exists(path: impl AsRef<str>) -> Self {
        Self::NameCollision(format!(
            "cannot create, a directory with that name exists: {}",
            path.as_ref()
        ))
    }

    /// Create a NameCollision error for an archive member clashing with
    /// another member.
    pub fn name_collision(msg: impl Into<String>) -> Self {
        Self::NameCollision(msg.into())
    }

    /// Create an ArchiveLoad error.
    pub fn archive_load(msg: impl Into<String>) -> Self {
        Self::ArchiveLoad(msg.into())
    }

    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VfsError::NotFound(_) => ErrorKind::NotFound,
            VfsError::NotADirectory(_) => ErrorKind::NotADirectory,
            VfsError::IsADirectory(_) => ErrorKind::IsADirectory,
            VfsError::PathEscapesRoot(_) => ErrorKind::PathEscapesRoot,
            VfsError::NameCollision(_) => ErrorKind::NameCollision,
            VfsError::ArchiveLoad(_) => ErrorKind::ArchiveLoadError,
            VfsError::ReadOnly => ErrorKind::ReadOnly,
            VfsError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<zip::result::ZipError> for VfsError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ArchiveLoad(e.to_string())
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::NotADirectory(msg) => io::Error::new(io::ErrorKind::NotADirectory, msg),
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::PathEscapesRoot(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            VfsError::NameCollision(msg) => io::Error::new(io::ErrorKind::AlreadyExists, msg),
            VfsError::ArchiveLoad(msg) => io::Error::new(io::ErrorKind::InvalidData, msg),
            VfsError::ReadOnly => {
                io::Error::new(io::ErrorKind::ReadOnlyFilesystem, "filesystem is read-only")
            }
            VfsError::Io(e) => e,
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(VfsError::not_found("/x").kind().to_string(), "NotFound");
        assert_eq!(
            VfsError::path_escapes_root("/..").kind().as_ref(),
            "PathEscapesRoot"
        );
        assert_eq!(
            VfsError::archive_load("bad").kind(),
            ErrorKind::ArchiveLoadError
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            VfsError::no_such_directory("/nope").to_string(),
            "no such directory: /nope"
        );
        assert_eq!(
            VfsError::cannot_remove_directory("/home").to_string(),
            "cannot remove, it is a directory: /home"
        );
        assert_eq!(
            VfsError::directory_exists("/tmp").to_string(),
            "cannot create, a directory with that name exists: /tmp"
        );
    }

    #[test]
    fn test_io_conversion() {
        let e: io::Error = VfsError::is_a_directory("/home").into();
        assert_eq!(e.kind(), io::ErrorKind::IsADirectory);

        let e: io::Error = VfsError::ReadOnly.into();
        assert_eq!(e.kind(), io::ErrorKind::ReadOnlyFilesystem);
    }
}
