//! Field lookup over the raw text of a single manifest object.
//!
//! Values come back as slices into the manifest; nothing is copied or decoded
//! here. String values keep their escapes, see [`crate::escape::decode`].

use crate::scan::{match_brace, match_bracket, skip_string};

/// UTF-8 byte order mark some editors put in front of the manifest.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// A field value classified by its leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// Interior of a quoted string, escapes untouched.
    Str(&'a str),
    /// A bare token such as `true`, `null` or `42`.
    Token(&'a str),
    /// An array including its brackets.
    Array(&'a str),
}

impl<'a> Field<'a> {
    /// Raw text of the value: string interior, token or array span.
    pub fn raw(&self) -> &'a str {
        match *self {
            Field::Str(s) | Field::Token(s) | Field::Array(s) => s,
        }
    }

    /// `true` when the value reads as `true`, ignoring ASCII case.
    pub fn is_true(&self) -> bool {
        match self {
            Field::Str(s) | Field::Token(s) => s.eq_ignore_ascii_case("true"),
            Field::Array(_) => false,
        }
    }
}

/// Returns the raw value of `key` in `object`, or `None` when the key is absent,
/// its string is unterminated, or the value is an array.
pub fn extract_value<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    match extract_field(object, key)? {
        Field::Array(_) => None,
        other => Some(other.raw()),
    }
}

/// Returns the inclusive `[...]` span stored under `key`.
pub fn extract_array<'a>(object: &'a str, key: &str) -> Option<&'a str> {
    match extract_field(object, key)? {
        Field::Array(span) => Some(span),
        _ => None,
    }
}

/// Looks up `key` and classifies its value.
pub fn extract_field<'a>(object: &'a str, key: &str) -> Option<Field<'a>> {
    let start = find_value_start(object, key)?;
    let bytes = object.as_bytes();

    match bytes.get(start)? {
        b'"' => {
            let end = skip_string(bytes, start)?;
            Some(Field::Str(&object[start + 1..end - 1]))
        }
        b'[' => {
            let close = match_bracket(object, start)?;
            Some(Field::Array(&object[start..=close]))
        }
        b't' | b'f' => {
            let len = object[start..]
                .bytes()
                .take_while(u8::is_ascii_alphabetic)
                .count();
            Some(Field::Token(&object[start..start + len]))
        }
        _ => {
            let len = object[start..]
                .bytes()
                // `\` covers the literal `\n` left in unwrapped string manifests
                .take_while(|b| {
                    !b.is_ascii_whitespace() && !matches!(*b, b',' | b'}' | b'\\')
                })
                .count();
            Some(Field::Token(&object[start..start + len]))
        }
    }
}

/// Finds `"key"` at the object's own nesting level and returns the index of the
/// first non-whitespace byte after its colon.
///
/// Strings are skipped whole, so a key-like sequence inside a value never
/// matches, and nested objects/arrays (children) are stepped over.
fn find_value_start(object: &str, key: &str) -> Option<usize> {
    let bytes = object.as_bytes();
    let leading = object.trim_start_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
    let own_depth = if leading.starts_with('{') { 1 } else { 0 };

    let mut depth = 0usize;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'"' => {
                let end = skip_string(bytes, index)?;

                if depth == own_depth && &object[index + 1..end - 1] == key {
                    let colon = skip_whitespace(bytes, end);
                    if bytes.get(colon) == Some(&b':') {
                        let value = skip_whitespace(bytes, colon + 1);
                        return (value < bytes.len()).then_some(value);
                    }
                }

                index = end;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += 1;
    }

    None
}

fn skip_whitespace(bytes: &[u8], mut index: usize) -> usize {
    while bytes.get(index).is_some_and(u8::is_ascii_whitespace) {
        index += 1;
    }
    index
}

/// Error item yielded by [`ObjectSpans`] when an element object never closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unbalanced {
    /// Byte offset of the unmatched `{` within the array span.
    pub offset: usize,
}

/// Iterator over the `{...}` elements of an array span.
pub struct ObjectSpans<'a> {
    array: &'a str,
    cursor: usize,
    done: bool,
}

/// Iterates the objects that are direct elements of `array` (`[` ... `]`).
pub fn object_spans(array: &str) -> ObjectSpans<'_> {
    let cursor = usize::from(array.starts_with('['));
    ObjectSpans {
        array,
        cursor,
        done: false,
    }
}

impl<'a> Iterator for ObjectSpans<'a> {
    type Item = Result<&'a str, Unbalanced>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let bytes = self.array.as_bytes();

        while self.cursor < bytes.len() {
            match bytes[self.cursor] {
                b'{' => {
                    let open = self.cursor;
                    return match match_brace(self.array, open) {
                        Some(close) => {
                            self.cursor = close + 1;
                            Some(Ok(&self.array[open..=close]))
                        }
                        None => {
                            self.done = true;
                            Some(Err(Unbalanced { offset: open }))
                        }
                    };
                }
                // a stray string element; objects are the only entries we read
                b'"' => match skip_string(bytes, self.cursor) {
                    Some(end) => self.cursor = end,
                    None => break,
                },
                b']' => break,
                _ => self.cursor += 1,
            }
        }

        self.done = true;
        None
    }
}
