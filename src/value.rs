//! The compiled expression tree.
//!
//! [`Value`] is the closed set of node variants an expression compiles into.
//! Each node can evaluate itself against an explicit variable-value buffer,
//! produce a structurally independent copy via `Clone`, and render back to a
//! canonical fully-parenthesized textual form via `Display`.
//!
//! The tree is built once during compilation and never mutated afterwards.
//! Variable nodes hold only a zero-based slot index; the buffer they read from
//! is passed into every evaluation call rather than reached through a
//! back-reference to the owning expression, so a cloned tree can never
//! accidentally evaluate against the original's buffer. The only interior
//! state is the per-call-node scratch buffer used to hand evaluated arguments
//! to a function callback without allocating on every call.

use std::cell::RefCell;
use std::fmt;

use itertools::Itertools;

use crate::token::{BinaryOp, Constant, Function, LazyVariable, UnaryOp};

/// An evaluable node of a compiled expression.
#[derive(Debug, Clone)]
pub enum Value {
    /// A literal number, including the results of constant folding
    Literal(f64),
    /// A named immutable constant such as `pi`
    Constant(Constant),
    /// A positional variable slot, zero-based (surface syntax `$1` is slot 0)
    Variable(usize),
    /// A named variable resolved by invoking an external supplier every time
    Lazy(LazyVariable),
    /// A binary operator applied to two child values
    Binary {
        op: BinaryOp,
        left: Box<Value>,
        right: Box<Value>,
    },
    /// A unary operator applied to one child value
    Unary { op: UnaryOp, operand: Box<Value> },
    /// A function call with exactly as many arguments as the function's arity
    Call {
        function: Function,
        args: Vec<Value>,
        scratch: RefCell<Vec<f64>>,
    },
}

impl Value {
    /// Builds a function call node with a scratch buffer sized to the
    /// function's arity, so evaluation never allocates.
    pub fn call(function: Function, args: Vec<Value>) -> Self {
        let scratch = RefCell::new(Vec::with_capacity(function.arg_count()));
        Value::Call {
            function,
            args,
            scratch,
        }
    }

    /// Evaluates this node against the given variable-value buffer.
    ///
    /// Every `Variable` index in a compiled tree is below the owning
    /// expression's variable count, and [`crate::CompiledExpression`]
    /// validates the buffer length before calling in, so indexing here is
    /// never rechecked.
    pub fn evaluate(&self, variables: &[f64]) -> f64 {
        match self {
            Value::Literal(value) => *value,
            Value::Constant(constant) => constant.value(),
            Value::Variable(index) => variables[*index],
            Value::Lazy(lazy) => lazy.get(),
            Value::Binary { op, left, right } => {
                op.apply(left.evaluate(variables), right.evaluate(variables))
            }
            Value::Unary { op, operand } => op.apply(operand.evaluate(variables)),
            Value::Call {
                function,
                args,
                scratch,
            } => {
                let mut buffer = scratch.borrow_mut();
                buffer.clear();
                for arg in args {
                    buffer.push(arg.evaluate(variables));
                }
                function.call(&buffer)
            }
        }
    }

    /// Returns the compile-time-known value of this node, if it has one.
    ///
    /// Literals and named constants qualify; lazy variables never do, even
    /// though they take no arguments, because their supplier may change
    /// between evaluations.
    pub(crate) fn as_constant(&self) -> Option<f64> {
        match self {
            Value::Literal(value) => Some(*value),
            Value::Constant(constant) => Some(constant.value()),
            _ => None,
        }
    }

    /// The highest variable slot index reachable from this node, if any.
    pub(crate) fn max_variable_index(&self) -> Option<usize> {
        match self {
            Value::Variable(index) => Some(*index),
            Value::Binary { left, right, .. } => {
                left.max_variable_index().max(right.max_variable_index())
            }
            Value::Unary { operand, .. } => operand.max_variable_index(),
            Value::Call { args, .. } => args.iter().filter_map(Value::max_variable_index).max(),
            _ => None,
        }
    }
}

/// Renders the canonical textual form: literals in `4.0` style, every
/// operation fully parenthesized, function arguments comma-separated.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(value) => write!(f, "{value:?}"),
            Value::Constant(constant) => write!(f, "{}", constant.name()),
            Value::Variable(index) => write!(f, "${}", index + 1),
            Value::Lazy(lazy) => write!(f, "{}", lazy.name()),
            Value::Binary { op, left, right } => write!(f, "({left}{}{right})", op.symbol()),
            Value::Unary { op, operand } => write!(f, "({}{operand})", op.symbol()),
            Value::Call { function, args, .. } => {
                write!(f, "{}({})", function.name(), args.iter().format(", "))
            }
        }
    }
}
