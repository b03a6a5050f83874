//! # hakoniwa-vfs
//!
//! An in-memory virtual filesystem seeded from a ZIP archive or a small
//! default layout.
//!
//! Key components:
//!
//! - [`Tree`] - directories and files as an explicit two-variant enum
//! - [`import`] - archive import with a degraded fallback on failure
//! - [`resolve`] - stack-based path resolution that refuses to escape `/`
//! - [`VirtualFs`] - list, cd, read, touch and rm over the tree
//! - [`VfsOps`] - the trait the command layer drives; [`HostFs`] is the
//!   read-only host passthrough implementing it
//!
//! ## Design Decisions
//!
//! - **Resolve to directories only**: file operations resolve the parent
//!   and look up the final name themselves.
//! - **Owned current path**: the session's working directory is a field,
//!   never the process working directory.
//! - **No write-back**: the archive is a read-only seed.

pub mod backends;
mod error;
pub mod import;
mod ops;
pub mod resolve;
mod tree;
mod types;

pub use backends::{HostFs, VirtualFs};
pub use error::{ErrorKind, VfsError, VfsResult};
pub use import::Origin;
pub use ops::VfsOps;
pub use tree::{Directory, Entry, File, Tree};
pub use types::{Content, DirEntry, FileType, Touched};
