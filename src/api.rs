use crate::{
    config::{self, Config},
    copy,
    materialize::{self, Tally},
    pack,
    preview::preview_as_tree,
    prompt,
    report::ConsoleReporter,
    source::{self, ManifestSource},
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum UnfurlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] source::LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pack(#[from] pack::PackError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Copy(#[from] copy::CopyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] prompt::PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] crate::errors::IoError),
}

/// Options for [`apply_manifest`], resolved from the CLI and the config file.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions<'a> {
    pub destination: Option<&'a str>,
    pub confirm: bool,
}

/// Materializes the manifest at `manifest` (`-` for stdin).
///
/// With `confirm` (from the options or the config) the tree is previewed first
/// and nothing is written unless the user agrees.
///
/// # Errors
///
/// Returns an [`UnfurlError`] if:
///
/// - The manifest cannot be read or has no `Files` array.
/// - The user prompt fails.
///
/// Individual entries that cannot be decoded or written are reported as
/// warnings and do not fail the call.
pub fn apply_manifest(
    manifest: &str,
    options: ApplyOptions<'_>,
    config: &Config,
) -> Result<(), UnfurlError> {
    let source = ManifestSource::from(manifest);
    let destination = config.destination_or(options.destination);
    let mut reporter = ConsoleReporter;

    log::debug!(
        "Attempting to materialize {} into {}",
        source,
        destination.display()
    );

    let summary = if options.confirm || config.confirm {
        let mut tally = Tally::new(&mut reporter);
        let entries = source::parse(&source, &mut tally)?;

        preview_as_tree(&entries, &destination);

        if !prompt::apply_changes()? {
            log::info!("cancelled, nothing written");
            return Ok(());
        }

        materialize::apply(&entries, &destination, &mut tally);
        tally.summary()
    } else {
        source::load(&source, &destination, &mut reporter)?
    };

    log::info!(
        "{} files, {} directories, {} warnings",
        summary.files,
        summary.directories,
        summary.warnings
    );

    Ok(())
}

/// Prints the tree a manifest would produce without writing anything.
pub fn preview_manifest(manifest: &str, config: &Config) -> Result<(), UnfurlError> {
    let source = ManifestSource::from(manifest);
    let entries = source::parse(&source, &mut ConsoleReporter)?;

    preview_as_tree(&entries, &config.destination_or(None));

    Ok(())
}

/// Serializes `directory` into a manifest, written to `output` or stdout.
pub fn pack_directory(
    directory: &str,
    output: Option<&str>,
    as_string: bool,
) -> Result<(), UnfurlError> {
    let entries = pack::pack_directory(Path::new(directory))?;
    let manifest = pack::to_manifest(&entries, as_string)?;

    match output {
        Some(path) => {
            let path = Path::new(path);
            std::fs::write(path, manifest).map_err(crate::errors::IoError::on(
                crate::errors::FileOperation::Write,
                path,
            ))?;
            log::info!("manifest written to {}", path.display());
        }
        None => println!("{}", manifest),
    }

    Ok(())
}

/// Copies `source` to `destination` verbatim.
pub fn copy_directory(source: &str, destination: &str) -> Result<(), UnfurlError> {
    copy::copy_tree(Path::new(source), Path::new(destination))?;

    Ok(())
}
