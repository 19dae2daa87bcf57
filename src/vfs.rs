use std::path::{Path, PathBuf};

/// One node of a manifest, decoded and ready to be written.
///
/// `path` is always the normalized segment relative to the parent directory
/// (or the destination root for top-level entries), never absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File { path: PathBuf, bytes: Vec<u8> },
    Directory { path: PathBuf, children: Vec<Entry> },
}
impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File { path, .. } | Self::Directory { path, .. } => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Number of files and directories in this subtree, itself included.
    pub fn count(&self) -> (usize, usize) {
        match self {
            Self::File { .. } => (1, 0),
            Self::Directory { children, .. } => {
                children.iter().fold((0, 1), |(files, dirs), child| {
                    let (f, d) = child.count();
                    (files + f, dirs + d)
                })
            }
        }
    }
}
