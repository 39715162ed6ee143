//! XML parser module

pub mod config;
pub mod model;
pub mod parser;

pub use config::{ParserConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE, MAX_DEPTH_LIMIT};
pub use model::{Content, Document, Element};
pub use parser::Parser;
