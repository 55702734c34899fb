//! Top-level token splitting for AON rows.

/// Splits `s` on every `separator` that is not nested inside a string
/// literal, parentheses or brackets. Parts are trimmed.
///
/// Blank input has no parts at all, which is how zero-field rows and empty
/// lists are represented.
pub fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());

    parts
}
