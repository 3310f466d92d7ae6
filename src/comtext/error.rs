//! Error types for comtext compilation
//!
//! Every failure is fatal to the compilation it occurs in. Errors carry the
//! file, directory and zero-based row/column where they were raised, and the
//! [`ErrorCause`] describing what went wrong.

use crate::comtext::evaluator::EvalError;
use std::fmt;

/// Why a parse failed
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCause {
    // structural
    HeaderUnterminated,
    HeaderParse(String),
    ExpectedBeginMarker(String),
    ExpectedEndMarker(String),
    UnexpectedBeginMarker(String),
    UnexpectedEndMarker(String),
    Outdented(usize),
    RecursionLimitExceeded(usize),
    // definitional
    UnknownFunction,
    ExpectedLineBreak,
    MissingDefMarker,
    TooManyDefMarkers,
    ConflictLanguage,
    ConflictMode,
    ConflictBreak,
    ForbidChar(String),
    UnknownParameter(String),
    ConflictCode,
    ParamMismatch,
    // environments
    UnknownEnvironment(String),
    TooFewArgs,
    LastMustVerbatim,
    EnvironmentExpectedLineBreak,
    // resolution
    FileNotFound(String),
    Io(String),
    // evaluation
    Evaluation(EvalError),
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCause::HeaderUnterminated => write!(f, "expected front matter's end marker"),
            ErrorCause::HeaderParse(reason) => {
                write!(f, "failed to parse yaml front matter, reason:\n{}", reason)
            }
            ErrorCause::ExpectedBeginMarker(marker) => {
                write!(f, "expected '{}' before scope", marker)
            }
            ErrorCause::ExpectedEndMarker(marker) => {
                write!(f, "expected '{}' at end of input", marker)
            }
            ErrorCause::UnexpectedBeginMarker(marker) => {
                write!(f, "unexpected '{}' opening", marker)
            }
            ErrorCause::UnexpectedEndMarker(marker) => write!(f, "unexpected '{}' closing", marker),
            ErrorCause::Outdented(indent) => {
                write!(f, "outdented scope, expected indentation > {}", indent)
            }
            ErrorCause::RecursionLimitExceeded(limit) => {
                write!(f, "macro expansion nested deeper than {} levels", limit)
            }
            ErrorCause::UnknownFunction => write!(f, "no suitable function found"),
            ErrorCause::ExpectedLineBreak => {
                write!(f, "expected immediate line break after command")
            }
            ErrorCause::MissingDefMarker => write!(f, "expected ':' in function definition"),
            ErrorCause::TooManyDefMarkers => write!(f, "unexpected ':' after function name"),
            ErrorCause::ConflictLanguage => write!(f, "conflicting language definition"),
            ErrorCause::ConflictMode => write!(f, "conflicting function type"),
            ErrorCause::ConflictBreak => write!(f, "conflicting autobreak mode"),
            ErrorCause::ForbidChar(name) => {
                write!(f, "forbidden character in argument '{}'", name)
            }
            ErrorCause::UnknownParameter(token) => write!(f, "unknown parameter '{}'", token),
            ErrorCause::ConflictCode => write!(f, "redefinition of the same function"),
            ErrorCause::ParamMismatch => {
                write!(f, "parameters differ between function definitions")
            }
            ErrorCause::UnknownEnvironment(name) => {
                write!(f, "no suitable environment found for '{}'", name)
            }
            ErrorCause::TooFewArgs => write!(f, "too few arguments taken"),
            ErrorCause::LastMustVerbatim => write!(f, "the last argument must be verbatim"),
            ErrorCause::EnvironmentExpectedLineBreak => write!(f, "expected line break"),
            ErrorCause::FileNotFound(name) => {
                write!(f, "described library '{}' does not exist", name)
            }
            ErrorCause::Io(msg) => write!(f, "IO error: {}", msg),
            ErrorCause::Evaluation(err) => write!(f, "{}", err),
        }
    }
}

impl From<EvalError> for ErrorCause {
    fn from(err: EvalError) -> Self {
        ErrorCause::Evaluation(err)
    }
}

/// A located compilation error
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    pub file: String,
    pub path: String,
    pub row: usize,
    pub col: usize,
    pub cause: ErrorCause,
}

impl ParserError {
    pub fn new(
        file: impl Into<String>,
        path: impl Into<String>,
        row: usize,
        col: usize,
        cause: ErrorCause,
    ) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            row,
            col,
            cause,
        }
    }

    /// The error message followed by a numbered excerpt of `source`
    pub fn render_with_context(&self, source: &str) -> String {
        format!("{}\n\n{}", self, format_source_context(source, self.row))
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.path.is_empty() {
            self.file.clone()
        } else {
            format!("{}/{}", self.path.trim_end_matches('/'), self.file)
        };
        write!(
            f,
            "{}:{}:{}: {}",
            location,
            self.row + 1,
            self.col + 1,
            self.cause
        )
    }
}

impl std::error::Error for ParserError {}

pub type ParseResult<T> = Result<T, ParserError>;

/// Format source code context around an error row
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, error_line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}
