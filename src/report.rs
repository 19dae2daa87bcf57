//! Diagnostics emitted while a manifest is parsed and written.
//!
//! Traversals never print on their own; they hand every event to a
//! [`Reporter`]. The CLI uses [`ConsoleReporter`], tests use [`Recorder`].

use crate::errors::IoError;
use colored::Colorize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A per-entry problem. The entry is skipped or written with defaults and the
/// traversal carries on.
#[derive(Debug, Error)]
pub enum Warning {
    #[error("entry #{index} under '{parent}' has no usable path, skipping")]
    MissingPath { parent: PathBuf, index: usize },

    #[error("'{path}' has no content, writing an empty file")]
    MissingContent { path: PathBuf },

    #[error("'{path}' is marked binary but its content is not valid base64 ({source}), writing an empty file")]
    InvalidBase64 {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },

    #[error("entry list under '{parent}' is cut off at byte {offset}, ignoring the rest")]
    UnbalancedEntries { parent: PathBuf, offset: usize },

    #[error("could not create directory, skipping its children: {0}")]
    CreateDirFailed(#[source] IoError),

    #[error("could not write file: {0}")]
    WriteFailed(#[source] IoError),
}

/// Sink for everything a traversal observes.
pub trait Reporter {
    fn created_dir(&mut self, path: &Path);
    fn wrote_file(&mut self, path: &Path, len: usize);
    fn warn(&mut self, warning: Warning);
}

/// Prints progress the way a scaffolding tool does: one green `create` line per
/// file on stdout and warnings on stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn created_dir(&mut self, path: &Path) {
        log::debug!("...directory ready: {}", path.display());
    }

    fn wrote_file(&mut self, path: &Path, len: usize) {
        log::debug!("...wrote {} bytes to {}", len, path.display());

        println!("{} {}", "create".green(), path.display());
    }

    fn warn(&mut self, warning: Warning) {
        log::debug!("entry problem: {:?}", warning);

        eprintln!("{} {}", "warning".yellow(), warning);
    }
}

#[derive(Debug)]
pub enum Event {
    CreatedDir(PathBuf),
    WroteFile(PathBuf, usize),
    Warned(Warning),
}

/// Keeps every event in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.events.iter().filter_map(|event| match event {
            Event::Warned(warning) => Some(warning),
            _ => None,
        })
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.events.iter().filter_map(|event| match event {
            Event::WroteFile(path, _) => Some(path.as_path()),
            _ => None,
        })
    }
}

impl Reporter for Recorder {
    fn created_dir(&mut self, path: &Path) {
        self.events.push(Event::CreatedDir(path.to_path_buf()));
    }

    fn wrote_file(&mut self, path: &Path, len: usize) {
        self.events.push(Event::WroteFile(path.to_path_buf(), len));
    }

    fn warn(&mut self, warning: Warning) {
        self.events.push(Event::Warned(warning));
    }
}
