//! Error types for Ship

use crate::script::TokenKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ship operations
pub type Result<T> = std::result::Result<T, ShipError>;

/// Main error type for Ship
#[derive(Error, Debug)]
pub enum ShipError {
    /// Script discovery and loading errors
    #[error("{0}")]
    Script(#[from] ScriptError),

    /// Structural errors found while parsing a script
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Build execution errors
    #[error("Build failed: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Script file errors
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Script not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read script '{}': {error}", .path.display())]
    Read { path: PathBuf, error: String },
}

/// Structural mismatches between the token stream and the grammar
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("expected {expected} but got {found} at line {line}")]
    Unexpected {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
    },

    #[error("expected argument name but got {found} at line {line}")]
    ExpectedArgName { found: TokenKind, line: usize },

    #[error("expected ':' after argument '{name}' but got {found} at line {line}")]
    ExpectedColon {
        name: String,
        found: TokenKind,
        line: usize,
    },

    #[error("unexpected {found} after end of script at line {line}")]
    TrailingInput { found: TokenKind, line: usize },

    #[error("nesting too deep at line {line}")]
    TooDeep { line: usize },
}

impl SyntaxError {
    /// Source line the error was reported at
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Unexpected { line, .. }
            | SyntaxError::ExpectedArgName { line, .. }
            | SyntaxError::ExpectedColon { line, .. }
            | SyntaxError::TrailingInput { line, .. }
            | SyntaxError::TooDeep { line } => *line,
        }
    }
}

/// Build execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("step {step} ({name}) exited with status {code}")]
    TaskFailed { step: usize, name: String, code: i32 },
}

/// Specialized result type for script loading
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

/// Specialized result type for parsing
pub type SyntaxResult<T> = std::result::Result<T, SyntaxError>;
