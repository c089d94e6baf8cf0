//! Replacement fields of f-string literals.

/// Expression text of one `{...}` replacement field.
///
/// `offset` is the byte offset of `text` inside the string token, so the
/// field maps back onto the source by adding the token's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatField<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Replacement fields of a string token, in source order.
///
/// Tokens without an `f` prefix have none. Nested fields inside format
/// specs (`{x:{width}}`) are reported after their enclosing field.
pub fn format_fields(token: &str) -> Vec<FormatField<'_>> {
    let bytes = token.as_bytes();
    let prefix_len = bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if !bytes[..prefix_len].iter().any(|b| b.eq_ignore_ascii_case(&b'f')) {
        return Vec::new();
    }

    let Some(&quote) = bytes.get(prefix_len) else {
        return Vec::new();
    };
    let triple = bytes[prefix_len..].starts_with(&[quote; 3]) && bytes.len() >= prefix_len + 6;
    let quote_len = if triple { 3 } else { 1 };
    let start = prefix_len + quote_len;
    let closing = &bytes[bytes.len().saturating_sub(quote_len)..];
    let end = if bytes.len() >= start + quote_len && closing.iter().all(|&b| b == quote) {
        bytes.len() - quote_len
    } else {
        bytes.len()
    };

    let mut fields = Vec::new();
    let mut i = start;
    let mut spec_depth = 0usize;
    while i < end {
        match bytes[i] {
            b'{' if spec_depth == 0 && bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'}' if spec_depth == 0 && bytes.get(i + 1) == Some(&b'}') => i += 2,
            b'}' if spec_depth > 0 => {
                spec_depth -= 1;
                i += 1;
            }
            b'{' => {
                let field_start = i + 1;
                let expr_end = expression_end(bytes, field_start, end);
                if expr_end > field_start {
                    fields.push(FormatField {
                        offset: field_start,
                        text: &token[field_start..expr_end],
                    });
                }
                i = expr_end;
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                }
                if bytes.get(i) == Some(&b'!') {
                    while i < end && !matches!(bytes[i], b':' | b'}') {
                        i += 1;
                    }
                }
                match bytes.get(i) {
                    Some(b':') => {
                        spec_depth += 1;
                        i += 1;
                    }
                    Some(b'}') => i += 1,
                    _ => {}
                }
            }
            _ => i += 1,
        }
    }
    fields
}

/// End of the expression part of a field starting at `start`: the first
/// top-level `}`, `:`, conversion `!` or self-documenting `=`.
fn expression_end(bytes: &[u8], start: usize, end: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < end {
        let b = bytes[i];
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' if depth > 0 => depth -= 1,
            b'}' => return i,
            b'\'' | b'"' => {
                i += 1;
                while i < end && bytes[i] != b {
                    i += 1;
                }
            }
            b':' if depth == 0 => return i,
            b'!' if depth == 0 && bytes.get(i + 1) != Some(&b'=') => return i,
            b'=' if depth == 0
                && !matches!(bytes[i - 1], b'=' | b'!' | b'<' | b'>' | b':')
                && matches!(bytes.get(i + 1), Some(b'}' | b'!' | b':')) =>
            {
                return i;
            }
            _ => {}
        }
        i += 1;
    }
    end
}
