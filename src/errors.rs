use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The filesystem action that was in flight when an [`IoError`] happened.
#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading")]
    Read,
    #[error("writing")]
    Write,
    #[error("creating directory")]
    Mkdir,
    #[error("copying")]
    Copy,
    #[error("walking directory")]
    Walk,
}

#[derive(Debug, Error, Diagnostic)]
#[error("I/O error while {operation} '{path}'")]
#[diagnostic(
    code(unfurl::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }

    /// Builds a `map_err` adapter for `operation` on `path`.
    ///
    /// ```ignore
    /// fs::read_to_string(&path).map_err(IoError::on(FileOperation::Read, &path))?;
    /// ```
    pub fn on(operation: FileOperation, path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |error| Self::new(operation, path.to_path_buf(), error)
    }
}
