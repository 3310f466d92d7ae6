//! YAML front matter
//!
//! A document may open with a header block fenced by lines of three or more
//! dashes. Blank lines before the opening fence are allowed. The header lines
//! are blanked out rather than removed so rows in later errors still match the
//! source file.

use crate::comtext::error::{ErrorCause, ParseResult, ParserError};
use crate::comtext::keywords;
use crate::comtext::source::Source;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static HEADER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(keywords::HEADER_MARKER).unwrap());

pub type Headers = BTreeMap<String, serde_yaml::Value>;

/// Split `source` into its header map and the remaining text
pub fn extract_header(source: &Source) -> ParseResult<(Headers, String)> {
    let mut lines: Vec<&str> = source.text.split('\n').collect();
    let Some(open) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Ok((Headers::new(), source.text.clone()));
    };
    if !HEADER_MARKER.is_match(lines[open]) {
        return Ok((Headers::new(), source.text.clone()));
    }

    let close = lines[open + 1..]
        .iter()
        .position(|line| HEADER_MARKER.is_match(line))
        .map(|offset| open + 1 + offset)
        .ok_or_else(|| {
            ParserError::new(
                &source.filename,
                &source.path,
                lines.len() - 1,
                0,
                ErrorCause::HeaderUnterminated,
            )
        })?;

    let yaml = lines[open + 1..close].join("\n");
    let headers = if yaml.trim().is_empty() {
        Headers::new()
    } else {
        serde_yaml::from_str::<Headers>(&yaml).map_err(|err| {
            ParserError::new(
                &source.filename,
                &source.path,
                open + 1,
                0,
                ErrorCause::HeaderParse(err.to_string()),
            )
        })?
    };

    for line in &mut lines[open..=close] {
        *line = "";
    }
    Ok((headers, lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_keeps_text() {
        let source = Source::from_string("plain\n---\n");
        let (headers, text) = extract_header(&source).unwrap();
        assert!(headers.is_empty());
        assert_eq!(text, "plain\n---\n");
    }

    #[test]
    fn header_is_parsed_and_blanked() {
        let source = Source::from_string("\n----\ntitle: Notes\ntags: [a, b]\n---\nbody");
        let (headers, text) = extract_header(&source).unwrap();
        assert_eq!(headers["title"], serde_yaml::Value::from("Notes"));
        assert_eq!(headers["tags"].as_sequence().map(Vec::len), Some(2));
        assert_eq!(text, "\n\n\n\n\nbody");
    }

    #[test]
    fn unterminated_header() {
        let source = Source::from_string("---\ntitle: x\nbody");
        let err = extract_header(&source).unwrap_err();
        assert_eq!(err.cause, ErrorCause::HeaderUnterminated);
        assert_eq!(err.row, 2);
    }

    #[test]
    fn marker_with_trailing_text_does_not_close() {
        let source = Source::from_string("---\ntitle: x\n--- \nbody");
        let err = extract_header(&source).unwrap_err();
        assert_eq!(err.cause, ErrorCause::HeaderUnterminated);
        assert_eq!(err.row, 3);
    }

    #[test]
    fn header_must_be_a_mapping() {
        let source = Source::from_string("---\n- a\n- b\n---\n");
        let err = extract_header(&source).unwrap_err();
        assert!(matches!(err.cause, ErrorCause::HeaderParse(_)));
        assert_eq!(err.row, 1);
    }

    #[test]
    fn empty_header() {
        let source = Source::from_string("---\n---\ntext");
        let (headers, text) = extract_header(&source).unwrap();
        assert!(headers.is_empty());
        assert_eq!(text, "\n\ntext");
    }
}
