//! The in-memory tree: entries, directories, files.
//!
//! Directories own their children outright. There is no way to move an
//! entry between directories, so the tree can never contain a cycle and
//! no entry is ever reachable from two parents.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;

use crate::error::{VfsError, VfsResult};
use crate::types::{Content, DirEntry, FileType};

/// A node in the tree.
#[derive(Debug, Clone)]
pub enum Entry {
    Directory(Directory),
    File(File),
}

impl Entry {
    /// File or directory.
    pub fn kind(&self) -> FileType {
        match self {
            Entry::Directory(_) => FileType::Directory,
            Entry::File(_) => FileType::File,
        }
    }

    /// The directory, if this is one.
    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }

    /// The directory, mutably, if this is one.
    pub fn as_dir_mut(&mut self) -> Option<&mut Directory> {
        match self {
            Entry::Directory(dir) => Some(dir),
            Entry::File(_) => None,
        }
    }

    /// The file, if this is one.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        }
    }
}

impl From<Directory> for Entry {
    fn from(dir: Directory) -> Self {
        Entry::Directory(dir)
    }
}

impl From<File> for Entry {
    fn from(file: File) -> Self {
        Entry::File(file)
    }
}

/// Ordered name → entry mapping. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    children: IndexMap<String, Entry>,
}

impl Directory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a direct child by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.children.get(name)
    }

    /// Look up a direct child by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.children.get_mut(name)
    }

    /// Returns true if a child named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.children.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Listing of the children in insertion order.
    pub fn entries(&self) -> Vec<DirEntry> {
        self.iter()
            .map(|(name, entry)| DirEntry::new(name, entry.kind()))
            .collect()
    }

    /// Insert a new child. Fails if the name is taken.
    pub fn insert(&mut self, name: &str, entry: impl Into<Entry>) -> VfsResult<()> {
        validate_name(name)?;
        match self.children.entry(name.to_string()) {
            MapEntry::Occupied(_) => Err(VfsError::name_collision(format!(
                "entry already exists: {name}"
            ))),
            MapEntry::Vacant(slot) => {
                slot.insert(entry.into());
                Ok(())
            }
        }
    }

    /// Get the child directory `name`, creating it when absent.
    ///
    /// Fails with `NameCollision` if `name` is taken by a file.
    pub fn ensure_dir(&mut self, name: &str) -> VfsResult<&mut Directory> {
        validate_name(name)?;
        let entry = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| Entry::Directory(Directory::new()));
        entry.as_dir_mut().ok_or_else(|| {
            VfsError::name_collision(format!("a file named {name} is in the way"))
        })
    }

    /// Insert or replace the file `name`.
    ///
    /// Fails with `NameCollision` if `name` is taken by a directory.
    pub fn put_file(&mut self, name: &str, file: File) -> VfsResult<()> {
        validate_name(name)?;
        if let Some(Entry::Directory(_)) = self.children.get(name) {
            return Err(VfsError::name_collision(format!(
                "a directory named {name} is in the way"
            )));
        }
        self.children.insert(name.to_string(), Entry::File(file));
        Ok(())
    }

    /// Remove a child, keeping the order of its siblings.
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.children.shift_remove(name)
    }
}

/// Names are non-empty path segments: no separator (`/` or `\`), not
/// `.` or `..`.
fn validate_name(name: &str) -> VfsResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(VfsError::name_collision(format!(
            "invalid entry name: {name:?}"
        )));
    }
    Ok(())
}

/// A file: content plus timestamps. `modified >= created` always holds.
#[derive(Debug, Clone)]
pub struct File {
    content: Content,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl File {
    /// Create a file stamped with `now`.
    pub fn new(content: impl Into<Content>, now: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            created: now,
            modified: now,
        }
    }

    /// The file's content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// When the file was created or imported.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// When the file was last touched.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Bump `modified`. Never moves it backwards, even if the clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified = self.modified.max(now);
    }
}

/// The whole hierarchy. The root is fixed at construction; mutations
/// happen inside it.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    root: Directory,
}

impl Tree {
    /// Wrap an already-built root directory.
    pub fn new(root: Directory) -> Self {
        Self { root }
    }

    /// The root directory.
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// The root directory, mutably.
    pub fn root_mut(&mut self) -> &mut Directory {
        &mut self.root
    }
}
