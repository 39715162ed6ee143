//! empreport: print a plain-text report of an employee XML record list
//!
//! This crate provides functionality to:
//! - Parse XML documents into a small DOM (`xml` module)
//! - Query elements by tag name in document order
//! - Render the employee report line by line to any writer
//! - Handle errors with file, parse and missing-field context
//!
//! # Examples
//! ```no_run
//! use empreport::{run, ReportConfig, ReportError};
//!
//! fn example() -> Result<(), ReportError> {
//!     let printed = run(&ReportConfig::default(), &mut std::io::stdout().lock())?;
//!     println!("{printed} employees");
//!     Ok(())
//! }
//! ```

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tracing::{debug, error, info, instrument};

pub mod config;
pub mod error;
pub mod lexer;
pub mod report;
pub mod xml;

// Re-exports
pub use config::{ReportConfig, DEFAULT_INPUT};
pub use error::{Error, ErrorKind, Pos, ReportError, Result, Span};
pub use report::{employees, Employee, Field, ReportPrinter};
pub use xml::{Content, Document, Element, Parser, ParserConfig};

/// Parse an XML string and normalize the resulting tree
pub fn parse_str(input: &str, config: ParserConfig) -> Result<Document> {
    let mut doc = Parser::with_config(input.as_bytes(), config).parse()?;
    doc.normalize();
    Ok(doc)
}

/// Read and parse an XML file, normalizing the resulting tree
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_file(path: &Path, config: ParserConfig) -> std::result::Result<Document, ReportError> {
    debug!("reading input file");

    let open_error = |source: io::Error| {
        error!("failed to read file: {}", source);
        ReportError::FileOpen {
            path: path.to_path_buf(),
            source,
        }
    };
    let parse_error = |source: Error| ReportError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // Reject oversized input before reading it into memory
    let len = fs::metadata(path).map_err(open_error)?.len();
    config
        .validate_size(usize::try_from(len).unwrap_or(usize::MAX))
        .map_err(parse_error)?;

    let bytes = fs::read(path).map_err(open_error)?;

    info!(bytes = bytes.len(), "file read successfully, parsing");

    let mut doc = Parser::with_config(&bytes, config)
        .parse()
        .map_err(parse_error)?;
    doc.normalize();

    debug!(root = %doc.root.name, "parsing completed");
    Ok(doc)
}

/// Read the configured input file and write its employee report to `out`.
///
/// Returns the number of employee blocks written. Open and parse failures
/// happen before anything is written.
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> std::result::Result<usize, ReportError> {
    let doc = parse_file(&config.input, config.parser)?;
    let printed = ReportPrinter::new(out).print(&doc)?;
    info!(printed, "report written");
    Ok(printed)
}
