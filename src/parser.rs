//! CSV Parsing Module
//!
//! Turns exported lead CSV text into header-keyed `Lead` records.
//!
//! The reader is deliberately lenient: ragged rows, stray quotes and blank
//! lines never fail. A two-state machine (`Unquoted`/`Quoted`) drives the scan:
//! - Unquoted: `"` opens a quoted section, `,` ends the field, a line break
//!   ends the field and the row, anything else is appended
//! - Quoted: `""` appends one literal quote, a lone `"` closes the section,
//!   anything else (line breaks included) is appended verbatim

use std::collections::HashMap;
use std::mem;

use crate::normalize::{is_blank, normalize_header};
use crate::types::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Parse CSV text into leads keyed by normalized header name
///
/// The first logical row is the header. Cells missing from a short row read
/// as empty strings; cells past the last header are ignored.
pub fn parse_csv(text: &str) -> Vec<Lead> {
    let mut rows = parse_rows(text).into_iter();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|h| normalize_header(h)).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        let mut fields = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let value = row.get(idx).cloned().unwrap_or_default();
            fields.insert(header.clone(), value);
        }
        Lead::from_fields(fields)
    })
    .collect()
}

/// Split CSV text into rows of raw cells, dropping rows whose cells are all blank
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Quoted => match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => state = State::Unquoted,
                _ => field.push(c),
            },
            State::Unquoted => match c {
                '"' => state = State::Quoted,
                ',' => row.push(mem::take(&mut field)),
                '\n' | '\r' => {
                    // CRLF counts as a single line break
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(mem::take(&mut field));
                    push_row(&mut rows, mem::take(&mut row));
                }
                _ => field.push(c),
            },
        }
    }

    row.push(field);
    push_row(&mut rows, row);

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|cell| !is_blank(cell)) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_field_with_commas() {
        let leads = parse_csv("a,\"b,c\",d\n1,\"2,3\",4");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].get("a"), Some("1"));
        assert_eq!(leads[0].get("b,c"), Some("2,3"));
        assert_eq!(leads[0].get("d"), Some("4"));
    }

    #[test]
    fn test_escaped_quotes() {
        let rows = parse_rows("\"say \"\"hi\"\"\",x");
        assert_eq!(rows, vec![vec!["say \"hi\"".to_string(), "x".to_string()]]);
    }

    #[test]
    fn test_quoted_newline_is_kept() {
        let leads = parse_csv("Notes,Email\n\"line one\nline two\",a@b.com\n");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].notes(), "line one\nline two");
        assert_eq!(leads[0].email(), "a@b.com");
    }

    #[test]
    fn test_ragged_row_fills_empty() {
        let leads = parse_csv("First name,Last name,Email\nAda\n");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].get("first name"), Some("Ada"));
        assert_eq!(leads[0].get("last name"), Some(""));
        assert_eq!(leads[0].get("email"), Some(""));
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let leads = parse_csv("a\n1,2,3");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].fields().len(), 1);
        assert_eq!(leads[0].get("a"), Some("1"));
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let leads = parse_csv("a,b\n\n , \n1,2\n,\n");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].get("b"), Some("2"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n\n  \n").is_empty());
    }

    #[test]
    fn test_header_only() {
        assert!(parse_csv("First name,Email\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let leads = parse_csv("Phone,Email\r\n555,a@b.com\r\n");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].phone(), "555");
        assert_eq!(leads[0].email(), "a@b.com");
    }

    #[test]
    fn test_headers_normalized() {
        let leads = parse_csv("\u{FEFF} Phone  Number ,EMAIL\n555,a@b.com");
        assert_eq!(leads[0].get("phone number"), Some("555"));
        assert_eq!(leads[0].get("email"), Some("a@b.com"));
    }

    #[test]
    fn test_stray_quote_does_not_fail() {
        // The quote mid-field opens a quoted section that runs to the next quote
        let rows = parse_rows("ab\"c,d\"e,f\n");
        assert_eq!(rows, vec![vec!["abc,de".to_string(), "f".to_string()]]);

        // An unterminated quote swallows the rest of the input into one field
        let rows = parse_rows("x,\"open\nstill open");
        assert_eq!(rows, vec![vec!["x".to_string(), "open\nstill open".to_string()]]);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let leads = parse_csv("a,b\n  1 , 2 ");
        assert_eq!(leads[0].get("a"), Some("  1 "));
        assert_eq!(leads[0].get("b"), Some(" 2 "));
    }
}
