/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and conversion.

use crate::ast::Span;
use jinja2_document::{DataKind, DocumentError};
use thiserror::Error;

/// Name under which the template source appears in rendered parse reports.
const SOURCE_NAME: &str = "<template>";

/// Errors that can occur while converting a template.
///
/// Every variant displays as the single diagnostic string handed back to
/// the caller in place of the output.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The template text is malformed. The message is the parser's
    /// rendered diagnostic.
    #[error("{message}")]
    Parse { message: String },

    /// A substitution, condition, or loop path does not exist in the document.
    #[error("{}", path_diagnostic(.path))]
    PathNotFound { path: String },

    /// A path resolved to a value that cannot be rendered as text.
    #[error("{}", path_diagnostic(.path))]
    UnsupportedType { path: String, kind: DataKind },

    /// A loop source resolved to something other than an array.
    #[error(
        "error while converting jinja2-template \n    can not iterate over item in path in json-input: {path}\n    the item has type {kind}, but only arrays can be used in a for-loop \n"
    )]
    NonIterable { path: String, kind: DataKind },

    /// The document could not be built from its serialized form.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

fn path_diagnostic(path: &str) -> String {
    format!(
        "error while converting jinja2-template \n    can not find item in path in json-input: {path}\n    or maybe the item does not have a valid format or the place where it should be used \n"
    )
}

/// A syntax error found while parsing template text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Short description of the problem.
    pub message: String,
    /// Byte range in the template source.
    pub span: Span,
}

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Create an error covering `span`.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Render this error as a report showing the offending part of `source`.
    pub fn render(&self, source: &str) -> String {
        use ariadne::{Config, Label, Report, ReportKind, Source};

        let (start, end) = self.char_range(source);
        let span = (SOURCE_NAME.to_string(), start..end);
        let label = Label::new(span).with_message(&self.message);
        let report = Report::build(ReportKind::Error, SOURCE_NAME.to_string(), start)
            .with_config(Config::default().with_color(false))
            .with_message("error while parsing jinja2-template")
            .with_label(label)
            .finish();

        let mut output = Vec::new();
        let cache = (SOURCE_NAME.to_string(), Source::from(source));
        match report.write(cache, &mut output) {
            Ok(()) => String::from_utf8_lossy(&output).into_owned(),
            Err(_) => format!("error while parsing jinja2-template: {}", self.message),
        }
    }

    /// The span as char offsets, widened to at least one character so the
    /// label stays visible at end of input.
    fn char_range(&self, source: &str) -> (usize, usize) {
        let clamp = |offset: usize| {
            let mut offset = offset.min(source.len());
            while !source.is_char_boundary(offset) {
                offset -= 1;
            }
            source[..offset].chars().count()
        };
        let total = source.chars().count();
        let start = clamp(self.span.start);
        let end = clamp(self.span.end).max(start);

        if end > start {
            (start, end)
        } else if start < total {
            (start, start + 1)
        } else {
            (start.saturating_sub(1), total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_not_found_message() {
        let err = ConvertError::PathNotFound {
            path: "a.b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error while converting jinja2-template \n    can not find item in path in json-input: a.b\n    or maybe the item does not have a valid format or the place where it should be used \n"
        );
    }

    #[test]
    fn test_unsupported_type_matches_path_not_found() {
        let missing = ConvertError::PathNotFound {
            path: "x".to_string(),
        };
        let unsupported = ConvertError::UnsupportedType {
            path: "x".to_string(),
            kind: DataKind::Bool,
        };
        assert_eq!(missing.to_string(), unsupported.to_string());
    }

    #[test]
    fn test_non_iterable_message_names_path_and_kind() {
        let err = ConvertError::NonIterable {
            path: "user.name".to_string(),
            kind: DataKind::String,
        };
        let message = err.to_string();
        assert!(message.contains("user.name"));
        assert!(message.contains("type string"));
    }

    #[test]
    fn test_parse_error_render_points_at_source() {
        let source = "Hello {{ name ";
        let err = ParseError::new("unterminated tag", 6..14);
        let report = err.render(source);

        assert!(report.contains("error while parsing jinja2-template"));
        assert!(report.contains("unterminated tag"));
        assert!(report.contains("Hello {{ name"));
    }

    #[test]
    fn test_parse_error_render_at_end_of_input() {
        let source = "{% if x %}";
        let err = ParseError::new("missing endif", 10..10);
        assert!(err.render(source).contains("missing endif"));
    }

    #[test]
    fn test_char_range_handles_multibyte_text() {
        let source = "héllo {{";
        // byte 7 is the start of `{{`, which is char 6
        let err = ParseError::new("x", 7..9);
        assert_eq!(err.char_range(source), (6, 8));
    }

    #[test]
    fn test_char_range_empty_source() {
        let err = ParseError::new("x", 0..0);
        assert_eq!(err.char_range(""), (0, 0));
    }
}
