use crate::{
    errors::{FileOperation, IoError},
    manifest::parse_entries,
    report::{Reporter, Warning},
    vfs::Entry,
};
use std::{fs, path::Path};

/// What a materialization did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub directories: usize,
    pub files: usize,
    pub warnings: usize,
}

/// Parses the entry array `span` and writes it under `root`.
pub fn materialize_span(span: &str, root: &Path, reporter: &mut dyn Reporter) -> Summary {
    let mut tally = Tally::new(reporter);

    let entries = parse_entries(span, Path::new("."), &mut tally);

    apply_entries(&entries, root, &mut tally);

    tally.summary
}

/// Writes `entries` under `root`, depth first and in order.
///
/// A directory exists on disk before any of its children is touched. Files
/// replace whatever was at their path, so the last entry for a path wins.
/// Failures only skip the entry concerned (and a failed directory's subtree).
pub fn apply(entries: &[Entry], root: &Path, reporter: &mut dyn Reporter) -> Summary {
    let mut tally = Tally::new(reporter);

    apply_entries(entries, root, &mut tally);

    tally.summary
}

fn apply_entries(entries: &[Entry], root: &Path, reporter: &mut dyn Reporter) {
    for entry in entries {
        let full_path = root.join(entry.path());

        match entry {
            Entry::Directory { children, .. } => {
                if let Err(error) = create_directory(&full_path) {
                    reporter.warn(Warning::CreateDirFailed(error));
                    continue;
                }
                reporter.created_dir(&full_path);

                apply_entries(children, &full_path, reporter);
            }
            Entry::File { bytes, .. } => match write_file(&full_path, bytes) {
                Ok(()) => reporter.wrote_file(&full_path, bytes.len()),
                Err(error) => reporter.warn(Warning::WriteFailed(error)),
            },
        }
    }
}

fn create_directory(path: &Path) -> Result<(), IoError> {
    fs::create_dir_all(path).map_err(IoError::on(FileOperation::Mkdir, path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        create_directory(parent)?;
    }

    fs::write(path, bytes).map_err(IoError::on(FileOperation::Write, path))
}

/// Forwards to the wrapped reporter while counting.
///
/// Wrap a reporter once when parsing and writing happen in separate steps, so
/// the summary covers both.
pub struct Tally<'r> {
    inner: &'r mut dyn Reporter,
    summary: Summary,
}
impl<'r> Tally<'r> {
    pub fn new(inner: &'r mut dyn Reporter) -> Self {
        Self {
            inner,
            summary: Summary::default(),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}
impl Reporter for Tally<'_> {
    fn created_dir(&mut self, path: &Path) {
        self.summary.directories += 1;
        self.inner.created_dir(path);
    }

    fn wrote_file(&mut self, path: &Path, len: usize) {
        self.summary.files += 1;
        self.inner.wrote_file(path, len);
    }

    fn warn(&mut self, warning: Warning) {
        self.summary.warnings += 1;
        self.inner.warn(warning);
    }
}
