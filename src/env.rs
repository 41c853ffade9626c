//! Expression environments: the configuration surface the parser compiles
//! against.
//!
//! An [`ExpressionEnv`] holds three independent prefix trees, consulted (but
//! never mutated) while compiling:
//!
//! - binary operators, looked up between terms;
//! - leading tokens (unary operators and functions), looked up at the start
//!   of a term;
//! - values (constants, named positional variables, lazy variables), also
//!   looked up at the start of a term and taking precedence over leading
//!   tokens.
//!
//! A fresh environment is pre-seeded with all built-in operators and
//! constants. Callers may register additional functions, lazily-evaluated
//! external variables, and an ordered list of named positional variables.
//! Registration is not synchronized: all registration calls must happen
//! before any compile that depends on them, and callers needing concurrent
//! registration must add their own locking. Reading one environment from many
//! concurrent compiles is fine.
//!
//! # Example
//!
//! ```
//! use fastexpr::{compile_with, ExpressionEnv};
//!
//! let mut env = ExpressionEnv::new();
//! env.add_function("mult", 2, |args| args[0] * args[1]).unwrap();
//! env.set_variable_names(&["x", "y"]).unwrap();
//!
//! let mut expr = compile_with("mult(x, y) + 1", &env).unwrap();
//! assert_eq!(expr.evaluate_2(6.0, 7.0).unwrap(), 43.0);
//! ```

use itertools::Itertools;

use crate::errors::{CompileError, CompileErrorKind};
use crate::token::{BinaryOp, Constant, Function, LazyVariable, LeadingToken, UnaryOp};
use crate::trie::CharTree;
use crate::value::Value;

/// A registry of the tokens available to expressions compiled against it.
pub struct ExpressionEnv {
    binary_operators: CharTree<BinaryOp>,
    leading_tokens: CharTree<LeadingToken>,
    values: CharTree<Value>,
    variable_count: usize,
}

impl ExpressionEnv {
    /// Creates an environment seeded with the built-in binary operators,
    /// unary operators, and constants. Constant names match
    /// case-insensitively; everything else is exact-match.
    pub fn new() -> Self {
        let mut binary_operators = CharTree::new();
        for op in BinaryOp::ALL {
            binary_operators.set(op.symbol(), op);
        }
        let mut leading_tokens = CharTree::new();
        for op in UnaryOp::ALL {
            leading_tokens.set(op.symbol(), LeadingToken::Unary(op));
        }
        let mut values = CharTree::new();
        for constant in Constant::ALL {
            for spelling in case_spellings(constant.name()) {
                values.set(&spelling, Value::Constant(constant));
            }
        }
        Self {
            binary_operators,
            leading_tokens,
            values,
            variable_count: 0,
        }
    }

    /// Registers a function callable from expressions compiled with this
    /// environment. The callback receives exactly `arg_count` evaluated
    /// arguments; arity is enforced at compile time.
    ///
    /// Fails with [`CompileErrorKind::InvalidIdentifier`] if the name is
    /// empty, contains non-ASCII characters, or does not start with a letter.
    pub fn add_function(
        &mut self,
        name: &str,
        arg_count: usize,
        callback: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Result<(), CompileError> {
        validate_identifier(name)?;
        self.leading_tokens
            .set(name, LeadingToken::Function(Function::new(name, arg_count, callback)));
        Ok(())
    }

    /// Registers any number of pre-built [`Function`] tokens.
    pub fn add_functions<I>(&mut self, functions: I) -> Result<(), CompileError>
    where
        I: IntoIterator<Item = Function>,
    {
        for function in functions {
            validate_identifier(function.name())?;
            let name = function.name().to_string();
            self.leading_tokens.set(&name, LeadingToken::Function(function));
        }
        Ok(())
    }

    /// Registers a lazily-evaluated variable whose value is supplied by an
    /// external callback at evaluation time. Lazy variables do not occupy a
    /// positional variable slot and are never constant-folded.
    pub fn add_lazy_variable(
        &mut self,
        name: &str,
        supplier: impl Fn() -> f64 + Send + Sync + 'static,
    ) -> Result<(), CompileError> {
        validate_identifier(name)?;
        self.values
            .set(name, Value::Lazy(LazyVariable::new(name, supplier)));
        Ok(())
    }

    /// Declares named positional variables, in order. A compiled expression's
    /// variable count is fixed to the declared count unless a higher `$N`
    /// literal appears in its text.
    pub fn set_variable_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), CompileError> {
        for name in names {
            validate_identifier(name.as_ref())?;
        }
        for (index, name) in names.iter().enumerate() {
            self.values.set(name.as_ref(), Value::Variable(index));
        }
        self.variable_count = names.len();
        Ok(())
    }

    /// The number of declared named positional variables.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub(crate) fn binary_operators(&self) -> &CharTree<BinaryOp> {
        &self.binary_operators
    }

    pub(crate) fn leading_tokens(&self) -> &CharTree<LeadingToken> {
        &self.leading_tokens
    }

    pub(crate) fn values(&self) -> &CharTree<Value> {
        &self.values
    }
}

impl Default for ExpressionEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Every case spelling of an ASCII name, so short built-in constant names can
/// be matched case-insensitively by an exact-match tree.
fn case_spellings(name: &str) -> Vec<String> {
    name.chars()
        .map(|c| {
            let (lower, upper) = (c.to_ascii_lowercase(), c.to_ascii_uppercase());
            if lower == upper {
                vec![lower]
            } else {
                vec![lower, upper]
            }
        })
        .multi_cartesian_product()
        .map(String::from_iter)
        .collect()
}

/// Registered names must be non-empty, ASCII, and start with a letter, so
/// they can never collide with literals, `$N` variables, or grouping
/// characters.
fn validate_identifier(name: &str) -> Result<(), CompileError> {
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic()) && name.is_ascii();
    if !valid {
        return Err(CompileError::new(
            CompileErrorKind::InvalidIdentifier(name.to_string()),
            0,
            name,
        ));
    }
    Ok(())
}
