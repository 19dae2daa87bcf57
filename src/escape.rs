//! Decoding of manifest string literals.

/// Turns the escape sequences of a string literal's interior into the text
/// they stand for.
///
/// Never fails. Anything it does not recognize, including a `\u` escape
/// without four hex digits or an unpaired surrogate, is kept as written.
pub fn decode(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;

    while let Some(slash) = rest.find('\\') {
        out.push_str(&rest[..slash]);
        rest = &rest[slash..];

        let mut chars = rest.chars();
        chars.next();

        let Some(escaped) = chars.next() else {
            // trailing lone backslash
            out.push('\\');
            rest = "";
            break;
        };

        let simple = match escaped {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '/' => Some('/'),
            _ => None,
        };

        if let Some(c) = simple {
            out.push(c);
            rest = &rest[2..];
            continue;
        }

        if escaped == 'u' {
            if let Some((c, consumed)) = decode_unicode(rest) {
                out.push(c);
                rest = &rest[consumed..];
                continue;
            }
        }

        // unknown escape: keep both characters
        out.push('\\');
        out.push(escaped);
        rest = &rest[1 + escaped.len_utf8()..];
    }

    out.push_str(rest);
    out
}

/// Decodes a `\uXXXX` escape at the start of `text`, pairing a high surrogate
/// with a following `\uXXXX` low surrogate. Returns the character and the
/// number of bytes consumed.
fn decode_unicode(text: &str) -> Option<(char, usize)> {
    let high = hex4(text.get(2..6)?)?;

    if let Some(c) = char::from_u32(high) {
        return Some((c, 6));
    }

    if (0xD800..0xDC00).contains(&high) && text.get(6..8) == Some("\\u") {
        let low = hex4(text.get(8..12)?)?;
        if (0xDC00..0xE000).contains(&low) {
            let scalar = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(scalar).map(|c| (c, 12));
        }
    }

    None
}

fn hex4(digits: &str) -> Option<u32> {
    if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        u32::from_str_radix(digits, 16).ok()
    } else {
        None
    }
}
