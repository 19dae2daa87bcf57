//! Structural delimiter matching over raw manifest text.
//!
//! All delimiters the scanner cares about are ASCII, so it works on bytes and
//! every index it returns is a valid `str` boundary.

/// Returns the index of the `]` that closes the `[` at `open`.
pub fn match_bracket(text: &str, open: usize) -> Option<usize> {
    match_delimiter(text, open, b'[', b']')
}

/// Returns the index of the `}` that closes the `{` at `open`.
pub fn match_brace(text: &str, open: usize) -> Option<usize> {
    match_delimiter(text, open, b'{', b'}')
}

/// Depth-counting scan from `open`. Delimiters inside quoted strings are not
/// structural and are skipped.
fn match_delimiter(text: &str, open: usize, opener: u8, closer: u8) -> Option<usize> {
    let bytes = text.as_bytes();

    if bytes.get(open) != Some(&opener) {
        return None;
    }

    let mut depth = 0usize;
    let mut index = open;

    while index < bytes.len() {
        match bytes[index] {
            b'"' => {
                index = skip_string(bytes, index)?;
                continue;
            }
            byte if byte == opener => depth += 1,
            byte if byte == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
        index += 1;
    }

    None
}

/// Given the index of an opening `"`, returns the index just past its closing
/// quote, or `None` if the string runs off the end of the buffer.
pub(crate) fn skip_string(bytes: &[u8], quote: usize) -> Option<usize> {
    let mut index = quote + 1;

    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'"' => return Some(index + 1),
            _ => index += 1,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_flat_and_nested_brackets() {
        let text = "[1, [2, 3], [[4]]]";
        assert_eq!(match_bracket(text, 0), Some(text.len() - 1));
        assert_eq!(match_bracket(text, 4), Some(9));
        assert_eq!(match_bracket(text, 12), Some(16));
    }

    #[test]
    fn matches_braces_inside_arrays() {
        let text = r#"[{"a": {"b": 1}}, {}]"#;
        assert_eq!(match_brace(text, 1), Some(15));
        assert_eq!(match_brace(text, 18), Some(19));
    }

    #[test]
    fn unbalanced_input_is_not_found() {
        assert_eq!(match_bracket("[[1]", 0), None);
        assert_eq!(match_brace("{", 0), None);
    }

    #[test]
    fn open_index_must_point_at_the_opener() {
        assert_eq!(match_bracket("x[]", 0), None);
        assert_eq!(match_brace("[]", 0), None);
        assert_eq!(match_brace("{}", 5), None);
    }

    #[test]
    fn delimiters_inside_strings_are_ignored() {
        let text = r#"{"content": "fn main() { let v = [1, 2; }"}"#;
        assert_eq!(match_brace(text, 0), Some(text.len() - 1));

        let text = r#"["a]\"]", "b"]"#;
        assert_eq!(match_bracket(text, 0), Some(text.len() - 1));
    }

    #[test]
    fn escaped_backslash_before_quote_closes_the_string() {
        let text = r#"{"p": "C:\\", "q": "}"}"#;
        assert_eq!(match_brace(text, 0), Some(text.len() - 1));
    }

    #[test]
    fn skip_string_reports_unterminated() {
        assert_eq!(skip_string(br#""abc"x"#, 0), Some(5));
        assert_eq!(skip_string(br#""abc\""#, 0), None);
    }
}
