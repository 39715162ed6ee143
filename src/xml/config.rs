use crate::error::{Error, ErrorKind, Pos, Result};

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024 * 1024; // 10MB
/// Hard ceiling on nesting depth; parsing and tree walks recurse per level
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Configuration for parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum element nesting depth, capped at `MAX_DEPTH_LIMIT`
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ParserConfig {
    /// Depth limit actually enforced
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_LIMIT)
    }

    pub fn validate_size(&self, len: usize) -> Result<()> {
        if len > self.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded { max: self.max_size },
                Pos::default(),
            ));
        }
        Ok(())
    }
}

/// Tracks element nesting depth during parsing
#[derive(Debug, Default)]
pub struct ParsingContext {
    current_depth: usize,
}

impl ParsingContext {
    pub const fn new() -> Self {
        Self { current_depth: 0 }
    }

    pub fn enter_nested(&mut self, config: &ParserConfig, pos: Pos) -> Result<()> {
        self.current_depth += 1;
        let max = config.effective_max_depth();
        if self.current_depth > max {
            return Err(Error::at(ErrorKind::MaxDepthExceeded { max }, pos));
        }
        Ok(())
    }

    pub fn exit_nested(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
