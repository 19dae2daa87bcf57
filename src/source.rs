use crate::{
    errors::{FileOperation, IoError},
    fields::{extract_array, BYTE_ORDER_MARK},
    manifest::{parse_entries, ENTRIES_KEY},
    materialize::{materialize_span, Summary},
    report::Reporter,
    vfs::Entry,
};
use miette::Diagnostic;
use std::{
    borrow::Cow,
    fmt,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("unable to read manifest")]
    #[diagnostic(code(unfurl::source::io))]
    Io(#[from] IoError),

    #[error("manifest from {origin} has no '{key}' array")]
    #[diagnostic(
        code(unfurl::source::entries_not_found),
        help("A manifest looks like {{\"Files\": [{{\"path\": \"...\", \"content\": \"...\"}}]}}")
    )]
    EntriesNotFound { origin: String, key: &'static str },
}

/// Where the manifest text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestSource {
    File(PathBuf),
    Stdin,
    Inline(String),
}
impl ManifestSource {
    /// Reads the whole manifest into memory.
    pub fn read(&self) -> Result<String, LoadError> {
        let text = match self {
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(IoError::on(FileOperation::Read, path))?
            }
            Self::Stdin => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(IoError::on(FileOperation::Read, Path::new("<stdin>")))?;
                buffer
            }
            Self::Inline(text) => text.clone(),
        };
        let text = match text.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => rest.to_owned(),
            None => text,
        };

        log::debug!("read {} bytes of manifest from {}", text.len(), self);

        Ok(text)
    }
}
impl From<&str> for ManifestSource {
    fn from(value: &str) -> Self {
        if value == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}
impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "'{}'", path.display()),
            Self::Stdin => write!(f, "stdin"),
            Self::Inline(_) => write!(f, "inline text"),
        }
    }
}

/// Undoes one level of string wrapping.
///
/// Upstream producers sometimes store the whole manifest as a string value, so
/// the text arrives as `"{\"Files\": [...]}"`. In that case the outer quotes
/// are dropped and `\"` / `\\` are turned back into `"` / `\`. Every other
/// sequence, `\n` included, is left for the entry decoder.
pub fn unwrap_string_manifest(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();

    if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
        return Cow::Borrowed(text);
    }

    log::debug!("manifest is wrapped in a string literal, unwrapping");

    let inner = &trimmed[1..trimmed.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    Cow::Owned(out)
}

/// Returns the top-level entry array span, if the manifest has one.
pub fn locate_entries(text: &str) -> Option<&str> {
    extract_array(text, ENTRIES_KEY)
}

fn entries_span<'t>(source: &ManifestSource, text: &'t str) -> Result<&'t str, LoadError> {
    locate_entries(text).ok_or_else(|| LoadError::EntriesNotFound {
        origin: source.to_string(),
        key: ENTRIES_KEY,
    })
}

/// Reads `source` and writes its tree under `destination`.
///
/// # Errors
///
/// Returns a [`LoadError`] before anything is written if:
///
/// - The manifest cannot be read.
/// - The manifest has no top-level `Files` array.
///
/// Problems with individual entries are reported as warnings and never fail the load.
pub fn load(
    source: &ManifestSource,
    destination: &Path,
    reporter: &mut dyn Reporter,
) -> Result<Summary, LoadError> {
    let raw = source.read()?;
    let text = unwrap_string_manifest(&raw);
    let span = entries_span(source, &text)?;

    log::info!(
        "materializing manifest from {} into {}",
        source,
        destination.display()
    );

    Ok(materialize_span(span, destination, reporter))
}

/// Reads `source` into its entry tree without touching the filesystem.
pub fn parse(source: &ManifestSource, reporter: &mut dyn Reporter) -> Result<Vec<Entry>, LoadError> {
    let raw = source.read()?;
    let text = unwrap_string_manifest(&raw);
    let span = entries_span(source, &text)?;

    Ok(parse_entries(span, Path::new("."), reporter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;
    use std::fs;

    #[test]
    fn source_from_argument() {
        assert_eq!(ManifestSource::from("-"), ManifestSource::Stdin);
        assert_eq!(
            ManifestSource::from("project.json"),
            ManifestSource::File(PathBuf::from("project.json"))
        );
    }

    #[test]
    fn plain_manifest_is_not_unwrapped() {
        let text = r#"{"Files": []}"#;
        assert!(matches!(unwrap_string_manifest(text), Cow::Borrowed(t) if t == text));
        assert!(matches!(unwrap_string_manifest("\""), Cow::Borrowed(_)));
    }

    #[test]
    fn string_wrapped_manifest_is_unwrapped_once() {
        let wrapped = r#" "{\"Files\": [{\"path\": \"a.txt\", \"content\": \"x\\ny \\\"q\\\"\"}]}" "#;
        assert_eq!(
            unwrap_string_manifest(wrapped),
            r#"{"Files": [{"path": "a.txt", "content": "x\ny \"q\""}]}"#
        );
    }

    #[test]
    fn locates_the_files_array() {
        let text = r#"{"name": "demo", "Files": [{"path": "a"}], "files": []}"#;
        assert_eq!(locate_entries(text), Some(r#"[{"path": "a"}]"#));
        assert_eq!(locate_entries(r#"{"files": []}"#), None);
    }

    #[test]
    fn missing_entries_key_is_fatal_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let source = ManifestSource::Inline(r#"{"files": [{"path": "a.txt"}]}"#.into());

        let result = load(&source, &out, &mut Recorder::new());

        assert!(matches!(result, Err(LoadError::EntriesNotFound { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let source = ManifestSource::File(dir.path().join("missing.json"));

        let result = load(&source, dir.path(), &mut Recorder::new());

        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn loads_a_string_wrapped_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("manifest.json");
        let inner = serde_json::json!({
            "Files": [
                {"path": "/src", "isDirectory": true, "children": [
                    {"path": "Main.java", "content": "class Main {\n\tString s = \"hi\\\\\";\n}\n"}
                ]}
            ]
        })
        .to_string();
        fs::write(&manifest, serde_json::to_string(&inner).unwrap()).unwrap();

        let out = dir.path().join("files");
        let summary = load(&ManifestSource::File(manifest), &out, &mut Recorder::new()).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(
            fs::read_to_string(out.join("src/Main.java")).unwrap(),
            "class Main {\n\tString s = \"hi\\\\\";\n}\n"
        );
    }

    #[test]
    fn byte_order_mark_is_dropped_before_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let source = ManifestSource::Inline(
            "\u{feff}{\"Files\": [{\"path\": \"a.txt\", \"content\": \"a\"}]}".into(),
        );

        assert!(!source.read().unwrap().starts_with(BYTE_ORDER_MARK));

        let summary = load(&source, dir.path(), &mut Recorder::new()).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "a");
    }

    #[test]
    fn pretty_printed_string_manifest_keeps_null_content_empty() {
        let dir = tempfile::tempdir().unwrap();
        let inner = "{\n  \"Files\": [\n    {\n      \"path\": \"a.txt\",\n      \"content\": null\n    }\n  ]\n}";
        let source = ManifestSource::Inline(serde_json::to_string(inner).unwrap());
        let mut recorder = Recorder::new();

        let summary = load(&source, dir.path(), &mut recorder).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), Vec::<u8>::new());
        let warnings: Vec<_> = recorder.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], crate::report::Warning::MissingContent { .. }));
        assert_eq!(
            recorder.written().collect::<Vec<_>>(),
            vec![dir.path().join("a.txt")]
        );
    }

    #[test]
    fn parse_does_not_write() {
        let source = ManifestSource::Inline(r#"{"Files": [{"path": "a.txt", "content": "a"}]}"#.into());

        let entries = parse(&source, &mut Recorder::new()).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_file());
    }
}
