//! Token definitions consulted by the parser at compile time.
//!
//! This module holds the closed sets of built-in binary and unary operators,
//! the named constants, and the two caller-supplied token kinds: [`Function`]
//! (a named callback with fixed arity) and [`LazyVariable`] (a named
//! zero-argument callback resolved at every evaluation). Operators are plain
//! `Copy` enums carrying their symbol, priority, and semantics; callbacks are
//! stored behind `Arc` so cloned expression trees share them and can be
//! evaluated from different threads.

use std::fmt;
use std::sync::Arc;

/// A binary operator usable between two terms of an expression.
///
/// Higher priority binds tighter; equal priorities group left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    BooleanOr,
    BooleanOrAlt,
    BooleanAnd,
    BooleanAndAlt,
    GreaterThan,
    LessThan,
    EqualTo,
    EqualToAlt,
    NotEqualTo,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
    Exponent,
    Multiply,
    Divide,
    Modulus,
    Add,
    Subtract,
    ScientificNotation,
}

impl BinaryOp {
    pub(crate) const ALL: [BinaryOp; 18] = [
        BinaryOp::BooleanOr,
        BinaryOp::BooleanOrAlt,
        BinaryOp::BooleanAnd,
        BinaryOp::BooleanAndAlt,
        BinaryOp::GreaterThan,
        BinaryOp::LessThan,
        BinaryOp::EqualTo,
        BinaryOp::EqualToAlt,
        BinaryOp::NotEqualTo,
        BinaryOp::GreaterThanOrEqualTo,
        BinaryOp::LessThanOrEqualTo,
        BinaryOp::Exponent,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Modulus,
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::ScientificNotation,
    ];

    /// The symbol that produces this operator in expression text.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::BooleanOr => "|",
            BinaryOp::BooleanOrAlt => "||",
            BinaryOp::BooleanAnd => "&",
            BinaryOp::BooleanAndAlt => "&&",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThan => "<",
            BinaryOp::EqualTo => "=",
            BinaryOp::EqualToAlt => "==",
            BinaryOp::NotEqualTo => "!=",
            BinaryOp::GreaterThanOrEqualTo => ">=",
            BinaryOp::LessThanOrEqualTo => "<=",
            BinaryOp::Exponent => "^",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulus => "%",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::ScientificNotation => "E",
        }
    }

    /// Evaluation priority; higher is evaluated first.
    pub fn priority(self) -> u8 {
        match self {
            BinaryOp::BooleanOr
            | BinaryOp::BooleanOrAlt
            | BinaryOp::BooleanAnd
            | BinaryOp::BooleanAndAlt => 0,
            BinaryOp::GreaterThan
            | BinaryOp::LessThan
            | BinaryOp::EqualTo
            | BinaryOp::EqualToAlt
            | BinaryOp::NotEqualTo
            | BinaryOp::GreaterThanOrEqualTo
            | BinaryOp::LessThanOrEqualTo => 1,
            BinaryOp::Add | BinaryOp::Subtract => 3,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulus => 4,
            BinaryOp::Exponent | BinaryOp::ScientificNotation => 5,
        }
    }

    /// Applies the operator to two values. Boolean operators treat exactly
    /// `1.0` as true and return `1.0` or `0.0`.
    pub fn apply(self, first: f64, second: f64) -> f64 {
        match self {
            BinaryOp::BooleanOr | BinaryOp::BooleanOrAlt => {
                bool_to_double(first == 1.0 || second == 1.0)
            }
            BinaryOp::BooleanAnd | BinaryOp::BooleanAndAlt => {
                bool_to_double(first == 1.0 && second == 1.0)
            }
            BinaryOp::GreaterThan => bool_to_double(first > second),
            BinaryOp::LessThan => bool_to_double(first < second),
            BinaryOp::EqualTo | BinaryOp::EqualToAlt => bool_to_double(first == second),
            BinaryOp::NotEqualTo => bool_to_double(first != second),
            BinaryOp::GreaterThanOrEqualTo => bool_to_double(first >= second),
            BinaryOp::LessThanOrEqualTo => bool_to_double(first <= second),
            BinaryOp::Exponent => first.powf(second),
            BinaryOp::Multiply => first * second,
            BinaryOp::Divide => first / second,
            BinaryOp::Modulus => first % second,
            BinaryOp::Add => first + second,
            BinaryOp::Subtract => first - second,
            BinaryOp::ScientificNotation => first * 10.0_f64.powf(second),
        }
    }
}

/// A leading unary operator, applied to exactly one following term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Asin,
    Acos,
    Atan,
    Abs,
    Round,
    Floor,
    Ceil,
    Log,
    Sqrt,
    Cbrt,
    Rand,
}

impl UnaryOp {
    pub(crate) const ALL: [UnaryOp; 19] = [
        UnaryOp::Negate,
        UnaryOp::Not,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Abs,
        UnaryOp::Round,
        UnaryOp::Floor,
        UnaryOp::Ceil,
        UnaryOp::Log,
        UnaryOp::Sqrt,
        UnaryOp::Cbrt,
        UnaryOp::Rand,
    ];

    /// The symbol that produces this operator in expression text.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Abs => "abs",
            UnaryOp::Round => "round",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Log => "log",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Cbrt => "cbrt",
            UnaryOp::Rand => "rand",
        }
    }

    /// Whether applying this operator to the same operand always yields the
    /// same result. Impure operators are never constant-folded.
    pub fn is_pure(self) -> bool {
        !matches!(self, UnaryOp::Rand)
    }

    /// Applies the operator to one value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            UnaryOp::Negate => -value,
            UnaryOp::Not => bool_to_double(value != 1.0),
            UnaryOp::Sin => value.sin(),
            UnaryOp::Cos => value.cos(),
            UnaryOp::Tan => value.tan(),
            UnaryOp::Sinh => value.sinh(),
            UnaryOp::Cosh => value.cosh(),
            UnaryOp::Tanh => value.tanh(),
            UnaryOp::Asin => value.asin(),
            UnaryOp::Acos => value.acos(),
            UnaryOp::Atan => value.atan(),
            UnaryOp::Abs => value.abs(),
            UnaryOp::Round => value.round(),
            UnaryOp::Floor => value.floor(),
            UnaryOp::Ceil => value.ceil(),
            UnaryOp::Log => value.ln(),
            UnaryOp::Sqrt => value.sqrt(),
            UnaryOp::Cbrt => value.cbrt(),
            UnaryOp::Rand => rand::random::<f64>() * value,
        }
    }
}

fn bool_to_double(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// A named mathematical or boolean constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
    True,
    False,
}

impl Constant {
    pub(crate) const ALL: [Constant; 4] = [Constant::Pi, Constant::E, Constant::True, Constant::False];

    /// The lower-case surface name of the constant.
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
            Constant::True => "true",
            Constant::False => "false",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::True => 1.0,
            Constant::False => 0.0,
        }
    }
}

/// A caller-registered function with a fixed argument count.
///
/// The callback receives the evaluated arguments as a slice whose length
/// always equals the declared arity; the parser enforces the arity at compile
/// time, so the callback never needs to validate it.
#[derive(Clone)]
pub struct Function {
    name: String,
    arg_count: usize,
    callback: Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>,
}

impl Function {
    /// Creates a function token. Identifier validity is checked when the
    /// function is registered with an environment, not here.
    pub fn new(
        name: &str,
        arg_count: usize,
        callback: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            arg_count,
            callback: Arc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Invokes the callback. No arity validation is done here.
    pub(crate) fn call(&self, args: &[f64]) -> f64 {
        (self.callback)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arg_count", &self.arg_count)
            .finish_non_exhaustive()
    }
}

/// A named variable resolved by invoking an external supplier at every
/// evaluation rather than reading from the bound-value buffer.
///
/// Lazy variables never occupy a variable slot and are never constant-folded.
#[derive(Clone)]
pub struct LazyVariable {
    name: String,
    supplier: Arc<dyn Fn() -> f64 + Send + Sync>,
}

impl LazyVariable {
    pub fn new(name: &str, supplier: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            name: name.to_string(),
            supplier: Arc::new(supplier),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn get(&self) -> f64 {
        (self.supplier)()
    }
}

impl fmt::Debug for LazyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyVariable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A token matched at the start of a term: either a unary operator or a
/// function name that must be followed by an argument list.
#[derive(Debug, Clone)]
pub enum LeadingToken {
    Unary(UnaryOp),
    Function(Function),
}
