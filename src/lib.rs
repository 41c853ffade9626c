//! Compile-once, evaluate-many arithmetic and boolean expressions.
//!
//! This crate compiles single-line expressions with named or positional
//! variables, constants, and user-supplied functions into a reusable,
//! side-effect-free evaluation tree. The intended use is hot-path numeric
//! evaluation (re-evaluating a formula per frame or per record) where
//! re-parsing on every call is unacceptable: compile once, then evaluate
//! repeatedly with different variable bindings at minimal cost.
//!
//! # Features
//!
//! - Longest-match tokenization against prefix trees, with no separate lexer
//! - Shunting-yard precedence resolution with eager constant folding
//! - Positional `$N` variables, declared named variables, and lazy variables
//!   backed by external callbacks
//! - Caller-registered functions with compile-time arity enforcement
//! - Allocation-free steady-state evaluation for the common call shapes
//!
//! # Example
//!
//! ```
//! use fastexpr::{compile, evaluate};
//!
//! // compile once, evaluate many times
//! let mut expr = compile("3 * $1 + 2").unwrap();
//! assert_eq!(expr.evaluate_1(4.0).unwrap(), 14.0);
//! assert_eq!(expr.evaluate_1(0.5).unwrap(), 3.5);
//!
//! // or one-shot for a single evaluation
//! assert_eq!(evaluate("$1 - $2", &[10.0, -4.0]).unwrap(), 14.0);
//! ```
//!
//! # Custom environments
//!
//! ```
//! use fastexpr::{compile_with, ExpressionEnv};
//!
//! let mut env = ExpressionEnv::new();
//! env.add_function("mult", 2, |args| args[0] * args[1]).unwrap();
//! env.set_variable_names(&["x", "y"]).unwrap();
//!
//! let mut expr = compile_with("mult(x, y)", &env).unwrap();
//! assert_eq!(expr.evaluate_2(11.0, 3.0).unwrap(), 33.0);
//! ```

pub use env::ExpressionEnv;
pub use errors::{CompileError, CompileErrorKind, EvalError, ExpressionError, NumberFormatError};
pub use expression::CompiledExpression;
pub use token::{BinaryOp, Constant, Function, LazyVariable, UnaryOp};
pub use value::Value;

pub mod prelude {
    pub use crate::env::ExpressionEnv;
    pub use crate::expression::CompiledExpression;
    pub use crate::{compile, compile_with, evaluate, evaluate_with};
}

/// Expression environments and registration API
pub mod env;
/// Error types for the various failure modes
pub mod errors;
/// The compiled-expression runtime
pub mod expression;
/// Fast scanning of decimal digit runs
pub mod number;
/// Token and operator definitions
pub mod token;
/// Prefix tree for longest-match token lookup
pub mod trie;
/// The compiled expression tree
pub mod value;

mod parser;

/// Compiles an expression against a default environment (built-in operators
/// and constants only).
///
/// # Example
/// ```
/// let mut expr = fastexpr::compile("2 ^ $1").unwrap();
/// assert_eq!(expr.evaluate_1(3.0).unwrap(), 8.0);
/// ```
pub fn compile(expression: &str) -> Result<CompiledExpression, CompileError> {
    compile_with(expression, &ExpressionEnv::new())
}

/// Compiles an expression against the given environment.
///
/// The environment is only read, never mutated, and may back any number of
/// concurrent compiles.
pub fn compile_with(
    expression: &str,
    env: &ExpressionEnv,
) -> Result<CompiledExpression, CompileError> {
    let root = parser::parse(expression, env)?;
    Ok(CompiledExpression::new(root, env.variable_count()))
}

/// Compiles and evaluates an expression once.
///
/// Only for one-off evaluations; if the expression will be evaluated again,
/// use [`compile`] and keep the [`CompiledExpression`].
pub fn evaluate(expression: &str, values: &[f64]) -> Result<f64, ExpressionError> {
    Ok(compile(expression)?.evaluate_with(values)?)
}

/// Compiles and evaluates an expression once against the given environment.
pub fn evaluate_with(
    expression: &str,
    env: &ExpressionEnv,
    values: &[f64],
) -> Result<f64, ExpressionError> {
    Ok(compile_with(expression, env)?.evaluate_with(values)?)
}
