//! Error types for predicate parsing.

use thiserror::Error;

/// Errors that can occur while parsing a predicate expression.
///
/// All of these are raised at configuration time; a successfully parsed
/// [`crate::Predicate`] evaluates without error.
#[derive(Error, Debug)]
pub enum PredicateError {
    /// Unexpected character or malformed token.
    #[error("lex error at offset {pos}: {message}")]
    Lexer {
        /// Byte offset into the expression.
        pos: usize,
        /// Error message.
        message: String,
    },

    /// Unexpected token or malformed structure.
    #[error("parse error at offset {pos}: {message}")]
    Parser {
        /// Byte offset into the expression.
        pos: usize,
        /// Error message.
        message: String,
    },

    /// Identifier outside the coordinate variables and named constants.
    #[error("unknown identifier '{0}' (expected x, y, z, pi, or e)")]
    UnknownIdentifier(String),

    /// Function call outside the whitelist.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Expression (or an `and`/`or`/`not` operand) is numeric where a
    /// boolean is required.
    #[error("expected a boolean expression, found {0}")]
    NotBoolean(String),

    /// Boolean sub-expression used where a number is required.
    #[error("expected a numeric expression, found {0}")]
    NotNumeric(String),
}

/// Result type for predicate operations.
pub type Result<T> = std::result::Result<T, PredicateError>;
