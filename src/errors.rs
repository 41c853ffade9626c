//! Error types for the fastexpr crate.
//!
//! This module defines the various error types that can occur during expression
//! compilation and evaluation. The main error types are:
//!
//! - `CompileError`: Structural or lexical problems discovered while parsing
//! - `EvalError`: Too few variable values supplied at evaluation time
//! - `NumberFormatError`: Malformed digit runs handed to the numeric scanner
//! - `ExpressionError`: High-level wrapper used by the one-shot API
//!
//! A `CompileError` carries the offending cursor position together with the full
//! source text, and its `Display` implementation renders a diagnostic of the
//! message, the source text, and a caret line pointing at the failure column.
//! None of these errors are retried internally; they propagate synchronously to
//! the caller and compilation either fully succeeds or produces no artifact.

use std::fmt;

use colored::Colorize;
use thiserror::Error;

/// Errors raised by the fast numeric scanner for malformed digit runs.
///
/// These should not occur on well-formed input reaching the scanner, since the
/// parser only invokes it on digit-prefixed spans.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberFormatError {
    /// The scanned span contained no characters
    #[error("zero-length number")]
    Empty,
    /// A second decimal point appeared in the same number
    #[error("second decimal point in number '{0}'")]
    SecondDecimalPoint(String),
    /// A character that is not a digit, a decimal point, or a leading sign
    #[error("non-numeric character '{0}' in number '{1}'")]
    InvalidDigit(char, String),
    /// An integer too large for the accumulator
    #[error("number '{0}' is out of range")]
    Overflow(String),
}

/// The specific structural or lexical problem behind a [`CompileError`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileErrorKind {
    /// A specific character was required at the cursor but not found
    #[error("expected '{0}'")]
    ExpectedChar(char),
    /// A term (literal, parenthesized expression, variable, or leading
    /// operation) was required but the input matched none of them
    #[error("expected a value")]
    ExpectedValue,
    /// Two terms were adjacent without a registered binary operator between them
    #[error("expected a binary operator")]
    ExpectedBinaryOperator,
    /// An anonymous `$N` variable with a missing, zero, or decimal index
    #[error("invalid anonymous variable index")]
    InvalidVariableIndex,
    /// Input remained after a complete expression was parsed
    #[error("dangling input after expression")]
    DanglingInput,
    /// The input ended where a term or closing character was still required
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// A registered name was empty, non-ASCII, or did not start with a letter
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    /// A malformed numeric literal
    #[error(transparent)]
    NumberFormat(#[from] NumberFormatError),
}

/// Raised for any structural or lexical problem discovered while compiling an
/// expression.
///
/// Carries the byte position of the failure and the full source text so the
/// `Display` implementation can render a caret diagnostic:
///
/// ```text
/// expected a binary operator at position 2
/// 1 1
///   ^
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    kind: CompileErrorKind,
    position: usize,
    source_text: String,
}

impl CompileError {
    pub(crate) fn new(kind: CompileErrorKind, position: usize, source_text: &str) -> Self {
        Self {
            kind,
            position,
            source_text: source_text.to_string(),
        }
    }

    /// The specific problem that aborted compilation.
    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }

    /// Byte offset into the source text at which compilation failed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The full source text of the failed compile.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at position {}", self.kind, self.position)?;
        writeln!(f, "{}", self.source_text)?;
        write!(f, "{}{}", " ".repeat(self.position), "^".red())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Raised only at evaluation time, when the caller supplies fewer variable
/// values than the compiled expression requires.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The supplied value count was below the compiled variable count
    #[error("too few variable values: expected {expected}, got {got}")]
    TooFewValues { expected: usize, got: usize },
}

/// High-level error for the one-shot compile-and-evaluate entry points.
///
/// Wraps the lower-level compilation and evaluation errors so callers that do
/// not keep the compiled artifact around can handle a single error type.
#[derive(Debug, Error)]
pub enum ExpressionError {
    /// The expression failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The expression compiled but was evaluated with too few values
    #[error(transparent)]
    Eval(#[from] EvalError),
}
