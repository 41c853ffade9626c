//! The reusable compiled artifact.
//!
//! A [`CompiledExpression`] wraps one immutable AST root, the number of
//! positional variable values it requires, and an owned, lazily-allocated
//! buffer those values are written into before every evaluation. The 0-, 1-,
//! and 2-argument entry points overwrite the existing buffer in place, so
//! steady-state evaluation of a fixed-arity expression performs no heap
//! allocation after the first call. That is the central performance property
//! of this runtime.
//!
//! Evaluation takes `&mut self` because the value buffer is shared mutable
//! state: one instance cannot be evaluated from two threads at once. To
//! evaluate the same logical expression concurrently, `clone()` an instance
//! per thread; clones are deep, structurally independent copies.

use std::fmt;

use colored::Colorize;

use crate::errors::EvalError;
use crate::value::Value;

/// A compiled, reusable, side-effect-free expression.
///
/// # Example
///
/// ```
/// let mut expr = fastexpr::compile("3 * $1 + $2").unwrap();
/// assert_eq!(expr.variable_count(), 2);
/// assert_eq!(expr.evaluate_2(4.0, 2.0).unwrap(), 14.0);
/// assert_eq!(expr.evaluate_with(&[1.0, 0.5]).unwrap(), 3.5);
/// ```
#[derive(Clone)]
pub struct CompiledExpression {
    root: Value,
    variable_count: usize,
    buffer: Vec<f64>,
}

impl CompiledExpression {
    /// Wraps a parsed root. The variable count is the larger of the highest
    /// `$N`/named slot index seen in the tree plus one and the environment's
    /// declared named-variable count.
    pub(crate) fn new(root: Value, declared_variables: usize) -> Self {
        let variable_count = root
            .max_variable_index()
            .map_or(0, |index| index + 1)
            .max(declared_variables);
        Self {
            root,
            variable_count,
            buffer: Vec::new(),
        }
    }

    /// The number of variable values every evaluation call must supply.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// The compiled AST root.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Evaluates an expression that uses no variables.
    pub fn evaluate(&mut self) -> Result<f64, EvalError> {
        self.check_count(0)?;
        Ok(self.root.evaluate(&self.buffer))
    }

    /// Evaluates with a single variable value, written into the owned buffer
    /// in place.
    pub fn evaluate_1(&mut self, first: f64) -> Result<f64, EvalError> {
        self.check_count(1)?;
        self.ensure_buffer();
        if let Some(slot) = self.buffer.first_mut() {
            *slot = first;
        }
        Ok(self.root.evaluate(&self.buffer))
    }

    /// Evaluates with two variable values, written into the owned buffer in
    /// place.
    pub fn evaluate_2(&mut self, first: f64, second: f64) -> Result<f64, EvalError> {
        self.check_count(2)?;
        self.ensure_buffer();
        for (slot, value) in self.buffer.iter_mut().zip([first, second]) {
            *slot = value;
        }
        Ok(self.root.evaluate(&self.buffer))
    }

    /// Evaluates with any number of variable values. Extra values beyond the
    /// required count are ignored; too few fail with
    /// [`EvalError::TooFewValues`].
    pub fn evaluate_with(&mut self, values: &[f64]) -> Result<f64, EvalError> {
        self.check_count(values.len())?;
        self.ensure_buffer();
        self.buffer.copy_from_slice(&values[..self.variable_count]);
        Ok(self.root.evaluate(&self.buffer))
    }

    fn check_count(&self, got: usize) -> Result<(), EvalError> {
        if got < self.variable_count {
            return Err(EvalError::TooFewValues {
                expected: self.variable_count,
                got,
            });
        }
        Ok(())
    }

    fn ensure_buffer(&mut self) {
        if self.buffer.len() < self.variable_count {
            self.buffer.resize(self.variable_count, 0.0);
        }
    }
}

/// Renders the canonical, fully parenthesized text form of the compiled tree,
/// which can be compiled again to recreate an equivalent expression.
impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Expression".cyan(), self.root)?;
        writeln!(f, "    {}: {}", "Variables".cyan(), self.variable_count)?;
        write!(f, "}}")
    }
}
