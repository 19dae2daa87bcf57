//! Reading manifest entry arrays into [`Entry`] trees.
//!
//! An entry object looks like
//!
//! ```json
//! { "path": "src", "isDirectory": true, "children": [
//!     { "path": "src/Main.java", "content": "class Main {}\n" },
//!     { "path": "logo.png", "isBinary": true, "content": "iVBORw0KGgo=" }
//! ] }
//! ```
//!
//! Every problem with a single entry becomes a [`Warning`]; parsing itself
//! never fails.

use crate::{
    escape,
    fields::{extract_array, extract_field, extract_value, object_spans, Field, Unbalanced},
    report::{Reporter, Warning},
    utils::normalize_entry_path,
    vfs::Entry,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// Key of the top-level entry array.
pub const ENTRIES_KEY: &str = "Files";

const PATH: &str = "path";
const CONTENT: &str = "content";
const IS_BINARY: &str = "isBinary";
const IS_DIRECTORY: &str = "isDirectory";
const CHILDREN: &str = "children";

/// Parses every entry object of `array` in document order.
///
/// `parent` is the logical location of the array inside the manifest and only
/// shows up in warnings.
pub fn parse_entries(array: &str, parent: &Path, reporter: &mut dyn Reporter) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (index, object) in object_spans(array).enumerate() {
        match object {
            Ok(object) => {
                if let Some(entry) = parse_entry(object, index, parent, reporter) {
                    entries.push(entry);
                }
            }
            Err(Unbalanced { offset }) => reporter.warn(Warning::UnbalancedEntries {
                parent: parent.to_path_buf(),
                offset,
            }),
        }
    }

    entries
}

fn parse_entry(
    object: &str,
    index: usize,
    parent: &Path,
    reporter: &mut dyn Reporter,
) -> Option<Entry> {
    let path = extract_value(object, PATH)
        .map(|raw| normalize_entry_path(&escape::decode(raw)))
        .filter(|path| !path.as_os_str().is_empty());

    let Some(path) = path else {
        reporter.warn(Warning::MissingPath {
            parent: parent.to_path_buf(),
            index,
        });
        return None;
    };

    let location = parent.join(&path);

    if flag(object, IS_DIRECTORY) {
        let children = extract_array(object, CHILDREN)
            .map(|array| parse_entries(array, &location, reporter))
            .unwrap_or_default();

        return Some(Entry::Directory { path, children });
    }

    let text = match extract_field(object, CONTENT) {
        Some(Field::Str(literal)) => Some(escape::decode(literal)),
        Some(Field::Token(token)) if token != "null" => Some(token.to_string()),
        _ => None,
    };

    let Some(text) = text else {
        reporter.warn(Warning::MissingContent { path: location });
        return Some(Entry::File {
            path,
            bytes: Vec::new(),
        });
    };

    let bytes = if flag(object, IS_BINARY) {
        decode_base64(&text, &location, reporter)
    } else {
        text.into_bytes()
    };

    Some(Entry::File { path, bytes })
}

fn flag(object: &str, key: &str) -> bool {
    extract_field(object, key).is_some_and(|field| field.is_true())
}

/// Standard base64 with any whitespace ignored. Invalid input degrades to no
/// bytes plus a warning.
fn decode_base64(text: &str, location: &Path, reporter: &mut dyn Reporter) -> Vec<u8> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => bytes,
        Err(error) => {
            reporter.warn(Warning::InvalidBase64 {
                path: location.to_path_buf(),
                source: error,
            });
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;
    use std::path::PathBuf;

    fn parse(array: &str) -> (Vec<Entry>, Recorder) {
        let mut recorder = Recorder::new();
        let entries = parse_entries(array, Path::new("."), &mut recorder);
        (entries, recorder)
    }

    fn file(path: &str, bytes: &[u8]) -> Entry {
        Entry::File {
            path: PathBuf::from(path),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn parses_text_binary_and_directories() {
        let (entries, recorder) = parse(
            r##"[
                {"path": "/README.md", "content": "# Title\n\nBody\t\"quoted\""},
                {"path": "img/dot.bin", "isBinary": true, "content": "AAEC/w=="},
                {"path": "src", "isDirectory": true, "children": [
                    {"path": "Main.java", "content": "class Main {}"},
                    {"path": "empty", "isDirectory": true}
                ]}
            ]"##,
        );

        assert_eq!(recorder.warnings().count(), 0);
        assert_eq!(
            entries,
            vec![
                file("README.md", b"# Title\n\nBody\t\"quoted\""),
                file("img/dot.bin", &[0, 1, 2, 255]),
                Entry::Directory {
                    path: "src".into(),
                    children: vec![
                        file("Main.java", b"class Main {}"),
                        Entry::Directory {
                            path: "empty".into(),
                            children: vec![],
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn missing_or_empty_path_is_skipped_with_a_warning() {
        let (entries, recorder) = parse(
            r#"[{"content": "orphan"}, {"path": "", "content": "x"}, {"path": "/"}, {"path": "kept.txt", "content": "ok"}]"#,
        );

        assert_eq!(entries, vec![file("kept.txt", b"ok")]);

        let indexes: Vec<usize> = recorder
            .warnings()
            .map(|warning| match warning {
                Warning::MissingPath { index, .. } => *index,
                other => panic!("unexpected warning: {other}"),
            })
            .collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn null_or_absent_content_is_an_empty_file() {
        let (entries, recorder) =
            parse(r#"[{"path": "a.txt", "content": null}, {"path": "b.txt"}]"#);

        assert_eq!(entries, vec![file("a.txt", b""), file("b.txt", b"")]);
        assert_eq!(recorder.warnings().count(), 2);
        assert!(recorder
            .warnings()
            .all(|warning| matches!(warning, Warning::MissingContent { .. })));
    }

    #[test]
    fn invalid_base64_degrades_to_empty_bytes() {
        let (entries, recorder) = parse(
            r#"[{"path": "bad.png", "isBinary": true, "content": "not-valid-base64!!"},
                {"path": "next.txt", "content": "still here"}]"#,
        );

        assert_eq!(entries, vec![file("bad.png", b""), file("next.txt", b"still here")]);
        let warnings: Vec<_> = recorder.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::InvalidBase64 { path, .. } if path == Path::new("./bad.png")
        ));
    }

    #[test]
    fn base64_tolerates_line_breaks_and_escaped_slashes() {
        let (entries, recorder) = parse(
            r#"[{"path": "x.bin", "isBinary": "TRUE", "content": "AAEC\/w==\n"}]"#,
        );

        assert_eq!(recorder.warnings().count(), 0);
        assert_eq!(entries, vec![file("x.bin", &[0, 1, 2, 255])]);
    }

    #[test]
    fn children_on_files_are_ignored() {
        let (entries, _) = parse(
            r#"[{"path": "a.txt", "content": "a", "children": [{"path": "ghost", "content": ""}]}]"#,
        );

        assert_eq!(entries, vec![file("a.txt", b"a")]);
    }

    #[test]
    fn scalar_content_is_written_verbatim() {
        let (entries, _) = parse(r#"[{"path": "n.txt", "content": 42}]"#);

        assert_eq!(entries, vec![file("n.txt", b"42")]);
    }

    #[test]
    fn brackets_inside_content_do_not_break_the_tree() {
        let (entries, recorder) = parse(
            r#"[{"path": "src", "isDirectory": true, "children": [
                    {"path": "a.rs", "content": "fn f() -> [u8; 2] { [1, 2] } ]]}}"}
               ]},
               {"path": "b.txt", "content": "after"}]"#,
        );

        assert_eq!(recorder.warnings().count(), 0);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], file("b.txt", b"after"));
    }

    #[test]
    fn truncated_array_keeps_complete_entries() {
        let (entries, recorder) = parse(r#"[{"path": "a.txt", "content": "a"}, {"path": "b.txt""#);

        assert_eq!(entries, vec![file("a.txt", b"a")]);
        assert!(matches!(
            recorder.warnings().next(),
            Some(Warning::UnbalancedEntries { .. })
        ));
    }
}
