//! In-memory filesystem backend.
//!
//! Holds the tree built by the importer plus the session's current path.
//! Nothing here ever touches the host filesystem after construction.

use std::path::Path;

use chrono::Utc;

use crate::error::{VfsError, VfsResult};
use crate::import::{self, Origin};
use crate::ops::VfsOps;
use crate::resolve::{self, Target};
use crate::tree::{Entry, File, Tree};
use crate::types::{Content, DirEntry, Touched};

/// In-memory filesystem with a current directory.
///
/// `current_path` is always a normalized absolute path naming an existing
/// directory: it is only replaced after the new target has resolved.
#[derive(Debug, Clone)]
pub struct VirtualFs {
    tree: Tree,
    origin: Origin,
    current_path: String,
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFs {
    /// Create a filesystem holding the default scaffold.
    pub fn new() -> Self {
        Self::load(None)
    }

    /// Import `archive`, or use the scaffold when there is none.
    ///
    /// Never fails: a bad archive yields a degraded tree (see
    /// [`Origin::Degraded`]).
    pub fn load(archive: Option<&Path>) -> Self {
        let (tree, origin) = import::import(archive);
        Self::from_tree(tree, origin)
    }

    /// Wrap an already built tree.
    pub fn from_tree(tree: Tree, origin: Origin) -> Self {
        Self {
            tree,
            origin,
            current_path: "/".to_string(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Resolve `path` to a directory, relative to the current path.
    pub fn resolve(&self, path: &str) -> VfsResult<resolve::Resolved<'_>> {
        resolve::resolve(&self.tree, &self.current_path, path)
    }

    /// Look up the file `path` points at.
    pub fn file(&self, path: &str) -> VfsResult<&File> {
        match Target::parse(path) {
            Target::Empty => Err(VfsError::not_found(path)),
            Target::Directory(dir) => {
                self.resolve(&dir)?;
                Err(VfsError::is_a_directory(path))
            }
            Target::Child { parent, name } => {
                let dir = self.resolve(&parent)?.dir();
                match dir.get(&name) {
                    Some(Entry::File(file)) => Ok(file),
                    Some(Entry::Directory(_)) => Err(VfsError::is_a_directory(path)),
                    None => Err(VfsError::not_found(path)),
                }
            }
        }
    }

    /// List a directory in insertion order.
    pub fn list_directory(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        Ok(self.resolve(path)?.dir().entries())
    }

    /// Change the current directory.
    pub fn change_directory(&mut self, path: &str) -> VfsResult<()> {
        let target = self.resolve(path)?.path();
        tracing::debug!(from = %self.current_path, to = %target, "change directory");
        self.current_path = target;
        Ok(())
    }

    /// Read a file's content.
    pub fn read_file(&self, path: &str) -> VfsResult<&Content> {
        Ok(self.file(path)?.content())
    }

    /// Create a file, or touch an existing one.
    pub fn create_file(&mut self, path: &str, content: &str, display_time: bool) -> VfsResult<Touched> {
        let (parent, name) = match Target::parse(path) {
            Target::Empty => return Err(VfsError::no_such_file(path)),
            Target::Directory(dir) => {
                self.resolve(&dir).map_err(|e| parent_error(e, path))?;
                return Err(VfsError::directory_exists(path));
            }
            Target::Child { parent, name } => (parent, name),
        };

        let dir = resolve::resolve_mut(&mut self.tree, &self.current_path, &parent)
            .map_err(|e| parent_error(e, path))?;
        let now = Utc::now();

        let touched = match dir.get_mut(&name) {
            Some(Entry::Directory(_)) => return Err(VfsError::directory_exists(path)),
            Some(Entry::File(file)) if display_time => Touched::Times {
                created: file.created(),
                modified: file.modified(),
            },
            Some(Entry::File(file)) => {
                file.touch(now);
                Touched::TimestampUpdated
            }
            None => {
                dir.insert(&name, File::new(content, now))?;
                Touched::Created
            }
        };

        tracing::debug!(path, outcome = %touched, "create file");
        Ok(touched)
    }

    /// Remove a file. Directories are rejected, never recursed into.
    pub fn remove_file(&mut self, path: &str) -> VfsResult<()> {
        let (parent, name) = match Target::parse(path) {
            Target::Empty => return Err(VfsError::no_such_file(path)),
            Target::Directory(dir) => {
                self.resolve(&dir).map_err(|e| parent_error(e, path))?;
                return Err(VfsError::cannot_remove_directory(path));
            }
            Target::Child { parent, name } => (parent, name),
        };

        let dir = resolve::resolve_mut(&mut self.tree, &self.current_path, &parent)
            .map_err(|e| parent_error(e, path))?;

        match dir.get(&name) {
            None => return Err(VfsError::no_such_file(path)),
            Some(Entry::Directory(_)) => return Err(VfsError::cannot_remove_directory(path)),
            Some(Entry::File(_)) => {}
        }
        dir.remove(&name);

        tracing::debug!(path, "remove file");
        Ok(())
    }
}

/// Report a missing parent as "no such directory"; other resolver
/// failures (root escape, a file in the way) keep their own kind.
fn parent_error(e: VfsError, path: &str) -> VfsError {
    match e {
        VfsError::NotFound(_) => VfsError::no_such_directory(path),
        other => other,
    }
}

impl VfsOps for VirtualFs {
    fn current_path(&self) -> String {
        self.current_path.clone()
    }

    fn list_directory(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        VirtualFs::list_directory(self, path)
    }

    fn change_directory(&mut self, path: &str) -> VfsResult<()> {
        VirtualFs::change_directory(self, path)
    }

    fn read_file(&self, path: &str) -> VfsResult<Content> {
        VirtualFs::read_file(self, path).cloned()
    }

    fn create_file(&mut self, path: &str, content: &str, display_time: bool) -> VfsResult<Touched> {
        VirtualFs::create_file(self, path, content, display_time)
    }

    fn remove_file(&mut self, path: &str) -> VfsResult<()> {
        VirtualFs::remove_file(self, path)
    }

    fn read_only(&self) -> bool {
        false
    }
}
