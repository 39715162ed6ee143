use std::path::PathBuf;

use crate::xml::ParserConfig;

/// Input file read when no path is given, relative to the working directory
pub const DEFAULT_INPUT: &str = "InputData.txt";

/// Settings for one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub parser: ParserConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            parser: ParserConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }
}
