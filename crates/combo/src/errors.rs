//! Error types for combo trees

use thiserror::Error;

/// Errors raised while reading combo text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input held nothing but whitespace
    #[error("empty combo expression")]
    Empty,

    /// A token that is not a builtin, argument, constant or literal
    #[error("unknown token `{token}` at offset {offset}")]
    UnknownToken { token: String, offset: usize },

    /// Argument reference `$0` or `!$0`
    #[error("argument index must be non-zero at offset {offset}")]
    ZeroArgument { offset: usize },

    #[error("unbalanced parenthesis at offset {offset}")]
    Unbalanced { offset: usize },

    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("unterminated string literal at offset {offset}")]
    UnterminatedString { offset: usize },

    /// Nesting exceeds the parser's depth limit
    #[error("expression nested too deeply at offset {offset}")]
    TooDeep { offset: usize },
}

/// Errors that can occur when building, rendering or parsing combo trees
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComboError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Rendering or parsing referenced a label that is not available
    #[error("no label matching `{0}`")]
    MissingLabel(String),

    /// Output format selector not recognised
    #[error("format `{0}` not supported")]
    UnknownFormat(String),

    /// The vertex has no spelling in the requested output format
    #[error("`{vertex}` cannot be rendered as {format}")]
    Unrepresentable { vertex: String, format: String },

    /// A node's child count violates its operator arity
    #[error("`{vertex}` expects {expected} children, found {found}")]
    Arity {
        vertex: String,
        expected: String,
        found: usize,
    },

    #[error("argument index must be non-zero")]
    ZeroArgument,
}

/// Result type for combo operations
pub type Result<T> = std::result::Result<T, ComboError>;
