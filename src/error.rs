//! Error types for empreport

use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// Position in source input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn point(pos: Pos) -> Self {
        Self::new(pos, pos)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.start.line, self.start.col)
    }
}

/// Error kind for detailed categorization of XML syntax errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    InvalidName,
    InvalidUtf8,
    UnexpectedEof,
    EmptyDocument,
    TrailingContent,
    UnexpectedClosingTag { name: String },
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    InvalidEntity { entity: String },
    Expected { expected: String, found: String },
    MaxDepthExceeded { max: usize },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::EmptyDocument => write!(f, "document has no root element"),
            Self::TrailingContent => write!(f, "content after root element"),
            Self::UnexpectedClosingTag { name } => {
                write!(f, "unexpected closing tag </{name}>")
            }
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity { entity } => write!(f, "invalid entity: &{entity};"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// XML syntax error with the position it was raised at
#[derive(Error, Clone, Debug, PartialEq)]
#[error("error at {span}: {kind}")]
pub struct Error {
    kind: ErrorKind,
    span: Span,
}

impl Error {
    pub const fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::point(pos))
    }
}

/// Result type alias for XML parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a report run.
///
/// Open and parse failures happen before any report line is written;
/// `MissingField` and `Output` can leave a partially written report behind.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot open input file {}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {} as XML", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Error,
    },

    #[error("employee #{index} (empid {empid:?}) has no <{field}> element")]
    MissingField {
        index: usize,
        empid: String,
        field: &'static str,
    },

    #[error("failed to write report")]
    Output(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, Pos::new(0, 1, 1));
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert_eq!(err.span().start.line, 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(
            ErrorKind::MismatchedTag {
                expected: "employee".to_string(),
                found: "staff".to_string(),
            },
            Pos::new(10, 2, 5),
        );
        let display = err.to_string();
        assert!(display.contains("error at line 2, column 5"));
        assert!(display.contains("expected </employee>, found </staff>"));
    }

    #[test]
    fn test_report_error_keeps_source() {
        let err = ReportError::Parse {
            path: PathBuf::from("InputData.txt"),
            source: Error::at(ErrorKind::UnexpectedEof, Pos::new(3, 1, 4)),
        };
        assert_eq!(err.to_string(), "cannot parse InputData.txt as XML");
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("error at line 1, column 4: unexpected end of input")
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = ReportError::MissingField {
            index: 2,
            empid: "7".to_string(),
            field: "nickname",
        };
        assert_eq!(
            err.to_string(),
            "employee #2 (empid \"7\") has no <nickname> element"
        );
    }
}
