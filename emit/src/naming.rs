//! Identifier case conversion shared by every emitter. Both conversions are
//! pure and idempotent: re-applying them to already-normalized input is a
//! no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeCase {
    Lower,
    Upper,
}

const fn is_separator(c: char) -> bool {
    matches!(c, '-' | '&' | '_' | '{' | '}' | ' ')
}

/// Converts an ASN.1 identifier to PascalCase.
///
/// A run separator (`-`, `&`, `_`, `{`, `}`, space) is dropped and the
/// following character uppercased. An uppercase letter directly following
/// another uppercase letter is lowercased, which collapses ALL-CAPS
/// acronyms to a single leading capital (`SNSSAI` becomes `Snssai`).
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    let mut last_was_upper = false;
    let mut first = true;

    while let Some(c) = chars.next() {
        if is_separator(c) {
            if let Some(next) = chars.next() {
                out.push(next.to_ascii_uppercase());
                last_was_upper = true;
            }
            first = false;
            continue;
        }
        if first {
            out.push(c.to_ascii_uppercase());
            last_was_upper = true;
            first = false;
        } else if c.is_ascii_uppercase() && last_was_upper {
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_uppercase() {
            out.push(c);
            last_was_upper = true;
        } else {
            out.push(c);
            last_was_upper = false;
        }
    }
    out
}

/// Converts an ASN.1 identifier to snake_case, lower or upper.
///
/// Lower mode inserts `_` before an uppercase letter that follows a
/// non-uppercase one; upper mode inserts `_` only at lowercase-to-uppercase
/// boundaries so consecutive-uppercase runs stay intact. `-`, `.`, `{`,
/// `}` and space map to `_`; a leading `&` or `_` is dropped, a leading
/// `_` produced by mapping is replaced by a default letter, and a trailing
/// `_` is trimmed.
pub fn to_snake_case(s: &str, mode: SnakeCase) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut last_changed = false;

    for i in 0..chars.len() {
        let c = chars[i];
        if i == 0 && (c == '&' || c == '_') {
            last_changed = true;
            continue;
        }
        match mode {
            SnakeCase::Lower => {
                if c.is_ascii_uppercase() {
                    if i > 0 && !last_changed {
                        out.push('_');
                    }
                    out.push(c.to_ascii_lowercase());
                    last_changed = true;
                } else if matches!(c, '-' | '.' | '{' | '}' | ' ') {
                    out.push('_');
                    last_changed = true;
                } else {
                    out.push(c);
                    last_changed = false;
                }
            }
            SnakeCase::Upper => {
                if c.is_ascii_lowercase() {
                    out.push(c.to_ascii_uppercase());
                    last_changed = true;
                } else if i > 0 && c.is_ascii_uppercase() {
                    if chars[i - 1].is_ascii_uppercase() || chars[i - 1] == '_' {
                        out.push(c);
                    } else {
                        out.push('_');
                        out.push(c);
                        last_changed = true;
                    }
                } else if matches!(c, '-' | '.' | '{' | '}' | ' ') {
                    out.push('_');
                    last_changed = true;
                } else {
                    out.push(c);
                    last_changed = false;
                }
            }
        }
    }

    if out.ends_with('_') {
        out.pop();
    }
    if out.starts_with('_') {
        let default = if mode == SnakeCase::Lower { 'a' } else { 'A' };
        out.replace_range(0..1, &default.to_string());
    }
    out
}
