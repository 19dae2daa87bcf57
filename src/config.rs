use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "unfurl.toml";
/// Materialization root when neither the CLI nor the config names one.
pub const DEFAULT_DESTINATION: &str = "files";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(unfurl::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(unfurl::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `unfurl.toml`.
///
/// ```toml
/// destination = "files"
/// confirm = false
/// ```
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub destination: Option<PathBuf>,
    pub confirm: bool,
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(IoError::on(FileOperation::Read, path))?;

        toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Loads `explicit` if given, else `unfurl.toml` in the working directory
    /// when present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    log::debug!("using config file {}", local.display());
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The CLI argument wins over the config file, which wins over the default.
    pub fn destination_or(&self, cli: Option<&str>) -> PathBuf {
        cli.map(PathBuf::from)
            .or_else(|| self.destination.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION))
    }
}
