//! Text Normalization Module
//!
//! Provides functions to:
//! - Canonicalize free text (invisible characters, line breaks, whitespace, case)
//! - Normalize CSV header names into field keys
//! - Split pipe-delimited disposition tags into tokens
//!
//! Exported CSVs routinely carry zero-width spaces, byte-order marks and
//! non-breaking spaces that make two visually identical tags compare unequal.
//! Every comparison in the pipeline goes through `normalize_text` first.

/// Characters replaced by an ordinary space before whitespace collapsing
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{00A0}')
}

/// Normalize text for comparison
///
/// Normalization rules:
/// 1. Zero-width characters, BOM and NBSP become a plain space
/// 2. `\r\n` and lone `\r` become `\n`
/// 3. Runs of spaces and tabs collapse to one space
/// 4. Leading/trailing whitespace is trimmed
/// 5. Lowercase
///
/// The function is total and idempotent.
pub fn normalize_text(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        let c = if is_invisible(c) {
            ' '
        } else if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            '\n'
        } else {
            c
        };

        if c == ' ' || c == '\t' {
            pending_space = true;
            continue;
        }
        if pending_space {
            collapsed.push(' ');
            pending_space = false;
        }
        collapsed.push(c);
    }

    collapsed.trim().to_lowercase()
}

/// True when the text holds nothing but whitespace and invisible characters
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || is_invisible(c))
}

/// Null-tolerant variant: a missing value normalizes to the empty string
pub fn normalize_optional(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

/// Normalize a CSV header cell into the field key used for lookups
///
/// Headers match case-insensitively and whitespace-tolerantly, so
/// `"  Phone   Number"` and `"phone number"` address the same field.
pub fn normalize_header(header: &str) -> String {
    normalize_text(header)
}

/// Split a raw disposition tag field on `|`, trimming and dropping empty tokens
///
/// `"Missed Appt | Iphone"` yields `["Missed Appt", "Iphone"]`.
pub fn split_tags(raw: &str) -> Vec<&str> {
    raw.split('|')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tag tokens in normalized form, ready for keyword comparison
pub fn normalized_tags(raw: &str) -> Vec<String> {
    split_tags(raw)
        .into_iter()
        .map(normalize_text)
        .filter(|token| !token.is_empty())
        .collect()
}
