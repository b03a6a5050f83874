//! Building the initial tree from a ZIP archive or the default scaffold.
//!
//! Import never fails from the caller's point of view. A missing,
//! unreadable or malformed archive yields a degraded tree with a single
//! `error.txt` describing what went wrong.
//!
//! Member handling:
//!
//! - `a/b/c.txt` creates directories `a` and `a/b` on demand and the file
//!   `c.txt` inside them.
//! - `a/b/` declares a directory, which may stay empty.
//! - `\` separates segments like `/`, so `win\note.txt` lands in `win/`.
//! - A member that needs a directory where an earlier member put a file, or
//!   a file where a directory exists, fails the whole import.
//! - Two file members at the same path: the later one wins.
//! - Members with `..` segments fail the import.

use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{VfsError, VfsResult};
use crate::resolve;
use crate::tree::{Directory, File, Tree};
use crate::types::Content;

/// Name of the file holding the failure description in a degraded tree.
pub const ERROR_FILE: &str = "error.txt";

/// Where the tree came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The built-in default layout.
    Scaffold,
    /// A successfully imported archive.
    Archive(PathBuf),
    /// The archive could not be imported; `reason` is in `error.txt`.
    Degraded { source: PathBuf, reason: String },
}

impl Origin {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Origin::Degraded { .. })
    }
}

/// Build a tree from `source`, or the default scaffold when there is none.
pub fn import(source: Option<&Path>) -> (Tree, Origin) {
    match source {
        None => (scaffold(Utc::now()), Origin::Scaffold),
        Some(path) => import_file(path),
    }
}

/// Import a ZIP file from disk.
pub fn import_file(path: &Path) -> (Tree, Origin) {
    let now = Utc::now();
    let result = fs::File::open(path)
        .map_err(|e| VfsError::archive_load(format!("cannot open {}: {e}", path.display())))
        .and_then(|file| read_archive(file, now));

    match result {
        Ok(tree) => {
            tracing::info!(archive = %path.display(), entries = tree.root().len(), "archive imported");
            (tree, Origin::Archive(path.to_path_buf()))
        }
        Err(e) => {
            tracing::warn!(archive = %path.display(), error = %e, "archive import failed, using degraded tree");
            let reason = e.to_string();
            (
                degraded(&reason, now),
                Origin::Degraded {
                    source: path.to_path_buf(),
                    reason,
                },
            )
        }
    }
}

/// Read every member of a ZIP archive into a fresh tree.
///
/// This is the strict path: errors are returned, not absorbed.
pub fn read_archive<R: Read + Seek>(reader: R, now: DateTime<Utc>) -> VfsResult<Tree> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut root = Directory::new();

    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        let name = member.name().to_string();
        let is_dir = member.is_dir();

        let mut bytes = Vec::new();
        if !is_dir {
            member
                .read_to_end(&mut bytes)
                .map_err(|e| VfsError::archive_load(format!("cannot read {name}: {e}")))?;
        }

        add_member(&mut root, &name, is_dir, bytes, now)?;
    }

    Ok(Tree::new(root))
}

/// Place one archive member into the tree.
pub fn add_member(
    root: &mut Directory,
    name: &str,
    is_dir: bool,
    bytes: Vec<u8>,
    now: DateTime<Utc>,
) -> VfsResult<()> {
    let normalized = resolve::normalize_separators(name);
    let mut segments = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(VfsError::archive_load(format!(
                    "member escapes the archive root: {name}"
                )));
            }
            s => segments.push(s),
        }
    }

    let file_name = if is_dir || normalized.ends_with('/') {
        None
    } else {
        segments.pop()
    };

    let mut dir = root;
    for segment in &segments {
        dir = dir.ensure_dir(segment).map_err(|e| collision(name, e))?;
    }

    if let Some(file_name) = file_name {
        let file = File::new(Content::from_bytes(bytes), now);
        dir.put_file(file_name, file).map_err(|e| collision(name, e))?;
    }
    Ok(())
}

fn collision(member: &str, e: VfsError) -> VfsError {
    VfsError::name_collision(format!("archive member {member} conflicts: {e}"))
}

/// The default layout: `home/text.txt`, an empty `tmp/`, and `readme.txt`.
pub fn scaffold(now: DateTime<Utc>) -> Tree {
    build_scaffold(now).unwrap_or_default()
}

fn build_scaffold(now: DateTime<Utc>) -> VfsResult<Tree> {
    let mut home = Directory::new();
    home.insert("text.txt", File::new("Sample text file.\n", now))?;

    let mut root = Directory::new();
    root.insert("home", home)?;
    root.insert("tmp", Directory::new())?;
    root.insert("readme.txt", File::new("Welcome to the VFS!\n", now))?;
    Ok(Tree::new(root))
}

/// A tree holding only `error.txt` with the failure description.
pub fn degraded(reason: &str, now: DateTime<Utc>) -> Tree {
    let mut root = Directory::new();
    let text = format!("Failed to load VFS archive: {reason}\n");
    match root.insert(ERROR_FILE, File::new(text, now)) {
        Ok(()) => Tree::new(root),
        Err(_) => Tree::default(),
    }
}
