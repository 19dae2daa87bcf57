//! Serializing a directory tree into a manifest.
//!
//! The output is what [`crate::source::load`] consumes: text files become
//! JSON strings, anything that is not clean UTF-8 becomes base64 with
//! `isBinary` set.

use crate::{
    errors::{FileOperation, IoError},
    vfs::Entry,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use miette::Diagnostic;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug, Diagnostic)]
pub enum PackError {
    #[error("I/O error within pack domain")]
    #[diagnostic(code(unfurl::pack::io))]
    Io(#[from] IoError),

    #[error("'{path}' is not a directory")]
    #[diagnostic(
        code(unfurl::pack::not_a_directory),
        help("Point pack at the root directory of the project")
    )]
    NotADirectory { path: PathBuf },

    #[error("unable to serialize manifest")]
    #[diagnostic(code(unfurl::pack::serialize))]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct WireManifest {
    #[serde(rename = "Files")]
    files: Vec<WireEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    is_binary: bool,
    is_directory: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<WireEntry>,
}
impl From<&Entry> for WireEntry {
    fn from(entry: &Entry) -> Self {
        let path = entry.path().to_string_lossy().into_owned();

        match entry {
            Entry::Directory { children, .. } => Self {
                path,
                content: None,
                is_binary: false,
                is_directory: true,
                children: children.iter().map(WireEntry::from).collect(),
            },
            Entry::File { bytes, .. } => {
                let (content, is_binary) = match text_content(bytes) {
                    Some(text) => (text.to_string(), false),
                    None => (STANDARD.encode(bytes), true),
                };
                Self {
                    path,
                    content: Some(content),
                    is_binary,
                    is_directory: false,
                    children: Vec::new(),
                }
            }
        }
    }
}

/// `Some` when `bytes` can travel as a text literal.
fn text_content(bytes: &[u8]) -> Option<&str> {
    if bytes.contains(&0) {
        return None;
    }
    std::str::from_utf8(bytes).ok()
}

/// Reads `dir` into an entry tree. Children are sorted by file name; anything
/// that is neither a regular file nor a directory is skipped.
pub fn pack_directory(dir: &Path) -> Result<Vec<Entry>, PackError> {
    if !dir.is_dir() {
        return Err(PackError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    read_level(dir)
}

fn read_level(dir: &Path) -> Result<Vec<Entry>, PackError> {
    let mut entries = Vec::new();

    for item in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let item = match item {
            Ok(item) => item,
            Err(error) => {
                let path = error.path().unwrap_or(dir).to_path_buf();

                Err(IoError::new(FileOperation::Walk, path, error.into()))?
            }
        };

        let path = PathBuf::from(item.file_name());

        if item.file_type().is_dir() {
            entries.push(Entry::Directory {
                path,
                children: read_level(item.path())?,
            });
        } else if item.file_type().is_file() {
            let bytes =
                fs::read(item.path()).map_err(IoError::on(FileOperation::Read, item.path()))?;

            entries.push(Entry::File { path, bytes });
        } else {
            log::debug!("skipping special file {}", item.path().display());
        }
    }

    Ok(entries)
}

/// Serializes `entries` as `{"Files": [...]}`. With `as_string` the whole
/// manifest is wrapped once more as a JSON string literal.
pub fn to_manifest(entries: &[Entry], as_string: bool) -> Result<String, PackError> {
    let manifest = WireManifest {
        files: entries.iter().map(WireEntry::from).collect(),
    };

    let text = serde_json::to_string_pretty(&manifest)?;

    if as_string {
        Ok(serde_json::to_string(&text)?)
    } else {
        Ok(text)
    }
}
