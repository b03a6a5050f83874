//! Path resolution.
//!
//! Resolution always lands on a directory. Callers that act on a file
//! resolve the parent and look the final name up themselves (see
//! [`Target`]).
//!
//! The walk keeps the lineage of visited directories on a stack. Each `..`
//! pops exactly one level; a `..` with nothing left to pop is a
//! [`VfsError::PathEscapesRoot`], never a silent clamp to `/`.

use std::borrow::Cow;

use crate::error::{VfsError, VfsResult};
use crate::tree::{Directory, Entry, Tree};

/// A successfully resolved directory and the names leading to it.
#[derive(Debug)]
pub struct Resolved<'a> {
    dir: &'a Directory,
    names: Vec<String>,
}

impl<'a> Resolved<'a> {
    /// The directory the path denotes.
    pub fn dir(&self) -> &'a Directory {
        self.dir
    }

    /// Names from the root down to the directory.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Normalized absolute form, e.g. `/home/docs` or `/`.
    pub fn path(&self) -> String {
        absolute(&self.names)
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

fn absolute(names: &[String]) -> String {
    format!("/{}", names.join("/"))
}

/// Treat `\` as a separator too.
pub fn normalize_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Lineage stack for one walk. The root is implicit below the stack.
struct Walk<'a> {
    root: &'a Directory,
    stack: Vec<(String, &'a Directory)>,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Directory) -> Self {
        Self {
            root,
            stack: Vec::new(),
        }
    }

    fn current(&self) -> &'a Directory {
        self.stack.last().map(|(_, dir)| *dir).unwrap_or(self.root)
    }

    /// Apply every segment of `path`. `shown` is what errors report.
    fn walk(&mut self, path: &str, shown: &str) -> VfsResult<()> {
        for segment in path.split('/') {
            self.step(segment, shown)?;
        }
        Ok(())
    }

    fn step(&mut self, segment: &str, shown: &str) -> VfsResult<()> {
        match segment {
            "" | "." => Ok(()),
            ".." => match self.stack.pop() {
                Some(_) => Ok(()),
                None => Err(VfsError::path_escapes_root(shown)),
            },
            name => match self.current().get(name) {
                Some(Entry::Directory(dir)) => {
                    self.stack.push((name.to_string(), dir));
                    Ok(())
                }
                Some(Entry::File(_)) => Err(VfsError::not_a_directory(shown)),
                None => Err(VfsError::not_found(shown)),
            },
        }
    }

    fn finish(self) -> Resolved<'a> {
        let dir = self.current();
        let names = self.stack.into_iter().map(|(name, _)| name).collect();
        Resolved { dir, names }
    }
}

/// Resolve `path` to a directory.
///
/// Absolute paths start at the root; relative ones start at `cwd`, which
/// must itself be an absolute path to an existing directory.
pub fn resolve<'a>(tree: &'a Tree, cwd: &str, path: &str) -> VfsResult<Resolved<'a>> {
    let path = normalize_separators(path);
    let mut walk = Walk::new(tree.root());

    if !path.starts_with('/') {
        walk.walk(cwd, cwd)?;
    }
    walk.walk(&path, &path)?;

    let resolved = walk.finish();
    tracing::trace!(path = %path, cwd, resolved = %resolved.path(), "resolved");
    Ok(resolved)
}

/// Resolve `path` to a directory for mutation.
pub fn resolve_mut<'a>(tree: &'a mut Tree, cwd: &str, path: &str) -> VfsResult<&'a mut Directory> {
    let names = resolve(tree, cwd, path)?.into_names();

    let mut dir = tree.root_mut();
    for name in &names {
        dir = dir
            .get_mut(name)
            .and_then(Entry::as_dir_mut)
            .ok_or_else(|| VfsError::not_found(path))?;
    }
    Ok(dir)
}

/// What a file-targeting path points at, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The path is empty.
    Empty,
    /// The path can only denote a directory: `/`, or a final `.`/`..`.
    Directory(String),
    /// A named child of the directory `parent`.
    Child { parent: String, name: String },
}

impl Target {
    /// Split a path into parent directory and final name.
    ///
    /// Trailing slashes are ignored. A bare name has an empty parent, which
    /// resolves to the current directory.
    pub fn parse(path: &str) -> Self {
        let path = normalize_separators(path);
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return if path.starts_with('/') {
                Target::Directory("/".to_string())
            } else {
                Target::Empty
            };
        }

        let (parent, name) = match trimmed.rfind('/') {
            Some(0) => ("/", &trimmed[1..]),
            Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
            None => ("", trimmed),
        };

        match name {
            "." | ".." => Target::Directory(trimmed.to_string()),
            _ => Target::Child {
                parent: parent.to_string(),
                name: name.to_string(),
            },
        }
    }
}
