use crate::errors::{FileOperation, IoError};
use colored::Colorize;
use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum CopyError {
    #[error("I/O error within copy domain")]
    #[diagnostic(code(unfurl::copy::io))]
    Io(#[from] IoError),

    #[error("'{path}' is not a directory")]
    #[diagnostic(code(unfurl::copy::not_a_directory))]
    NotADirectory { path: PathBuf },

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(unfurl::copy::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },
}

/// Copies every regular file under `source` to the same relative path under
/// `destination`, overwriting existing files. Returns the number of files copied.
///
/// # Errors
///
/// Returns a [`CopyError`] if `source` is not a directory or any file cannot be
/// read, created or written. Files copied before the failure stay in place.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize, CopyError> {
    if !source.is_dir() {
        return Err(CopyError::NotADirectory {
            path: source.to_path_buf(),
        });
    }

    let mut copied = 0;

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(source).to_path_buf();

                Err(IoError::new(FileOperation::Walk, path, error.into()))?
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path();
        let relative = match full_path.strip_prefix(source) {
            Ok(r) => r,
            Err(error) => Err(CopyError::StripPrefix {
                path: full_path.to_path_buf(),
                dir: source.to_path_buf(),
                source: error,
            })?,
        };

        let target = destination.join(relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(IoError::on(FileOperation::Mkdir, parent))?;
        }

        fs::copy(full_path, &target).map_err(IoError::on(FileOperation::Copy, full_path))?;

        println!(
            "{} {} -> {}",
            "copy".green(),
            full_path.display(),
            target.display()
        );

        copied += 1;
    }

    log::info!("copied {} files into {}", copied, destination.display());

    Ok(copied)
}
