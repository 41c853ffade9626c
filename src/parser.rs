//! The expression parser and its precedence resolver.
//!
//! Compilation is a single left-to-right pass over the raw text with a byte
//! cursor. Terms (literals, parenthesized sub-expressions, anonymous `$N`
//! variables, leading operations, environment-registered values) are
//! recognized directly against the environment's prefix trees with no
//! separate lexer, and the resulting stream of term/operator pairs is reduced
//! into a single tree by a shunting-yard pass that folds constant
//! sub-expressions as it goes.
//!
//! Whitespace is insignificant between tokens and never allowed inside a
//! numeric literal or identifier. An expression ends at end of input, at a
//! closing parenthesis, or at a comma inside a function argument list; any
//! input left over after a complete top-level expression is a compile error.

use crate::env::ExpressionEnv;
use crate::errors::{CompileError, CompileErrorKind};
use crate::number;
use crate::token::{BinaryOp, LeadingToken};
use crate::trie::CharTree;
use crate::value::Value;

/// Parses `text` into a single AST root against `env`.
pub(crate) fn parse(text: &str, env: &ExpressionEnv) -> Result<Value, CompileError> {
    let mut parser = Parser::new(text, env);
    parser.skip_whitespace();
    let value = parser.parse_expression()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error(CompileErrorKind::DanglingInput));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    cursor: usize,
    env: &'a ExpressionEnv,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, env: &'a ExpressionEnv) -> Self {
        Self {
            text,
            cursor: 0,
            env,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.cursor).copied()
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.text.len()
    }

    fn error(&self, kind: CompileErrorKind) -> CompileError {
        CompileError::new(kind, self.cursor, self.text)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.cursor += 1;
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), CompileError> {
        if self.peek() == Some(expected as u8) {
            self.cursor += 1;
            Ok(())
        } else {
            Err(self.error(CompileErrorKind::ExpectedChar(expected)))
        }
    }

    /// Longest-match lookup at the cursor; advances past the match, or leaves
    /// the cursor unmoved when nothing matches.
    fn lookup<'t, T>(&mut self, tree: &'t CharTree<T>) -> Option<&'t T> {
        let (value, length) = tree.get_from(self.text, self.cursor);
        if value.is_some() {
            self.cursor += length;
        }
        value
    }

    /// `expression := term (binaryOperator term)*`, ending at `)` , `,`, or
    /// end of input. Binary-operator resolution is delegated to the
    /// shunting-yard pass for correct precedence in a single sweep.
    fn parse_expression(&mut self) -> Result<Value, CompileError> {
        let env = self.env;
        let first = self.parse_term()?;
        self.skip_whitespace();
        if self.expression_ended() {
            return Ok(first);
        }
        let mut yard = ShuntingYard::new();
        yard.add_value(first);
        while !self.expression_ended() {
            let Some(&op) = self.lookup(env.binary_operators()) else {
                return Err(self.error(CompileErrorKind::ExpectedBinaryOperator));
            };
            yard.add_operator(op);
            self.skip_whitespace();
            yard.add_value(self.parse_term()?);
            self.skip_whitespace();
        }
        Ok(yard.finish())
    }

    fn expression_ended(&self) -> bool {
        matches!(self.peek(), None | Some(b')') | Some(b','))
    }

    fn parse_term(&mut self) -> Result<Value, CompileError> {
        let env = self.env;
        match self.peek() {
            None => Err(self.error(CompileErrorKind::UnexpectedEnd)),
            Some(c) if c.is_ascii_digit() || c == b'.' => self.parse_literal(),
            Some(b'(') => self.parse_nested_expression(),
            Some(b'$') => self.parse_anonymous_variable(),
            Some(_) => {
                if let Some(value) = self.lookup(env.values()) {
                    return Ok(value.clone());
                }
                match self.lookup(env.leading_tokens()).cloned() {
                    Some(token) => self.parse_leading_operation(token),
                    None => Err(self.error(CompileErrorKind::ExpectedValue)),
                }
            }
        }
    }

    fn parse_nested_expression(&mut self) -> Result<Value, CompileError> {
        self.expect_char('(')?;
        self.skip_whitespace();
        let value = self.parse_expression()?;
        self.expect_char(')')?;
        Ok(value)
    }

    fn parse_literal(&mut self) -> Result<Value, CompileError> {
        let start = self.cursor;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == b'.') {
            self.cursor += 1;
        }
        let value = number::parse_double(&self.text[start..self.cursor])
            .map_err(|e| CompileError::new(e.into(), start, self.text))?;
        Ok(Value::Literal(value))
    }

    /// `$N`: always a positional variable regardless of environment contents.
    /// `N` must be a bare positive integer; a decimal or missing index is
    /// rejected. Surface indices are one-based, slots zero-based.
    fn parse_anonymous_variable(&mut self) -> Result<Value, CompileError> {
        let dollar = self.cursor;
        self.cursor += 1;
        let start = self.cursor;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.cursor += 1;
        }
        let invalid = || CompileError::new(CompileErrorKind::InvalidVariableIndex, dollar, self.text);
        if self.peek() == Some(b'.') {
            return Err(invalid());
        }
        let index = number::parse_int(&self.text[start..self.cursor]).map_err(|_| invalid())?;
        if index < 1 {
            return Err(invalid());
        }
        Ok(Value::Variable(index as usize - 1))
    }

    fn parse_leading_operation(&mut self, token: LeadingToken) -> Result<Value, CompileError> {
        match token {
            LeadingToken::Unary(op) => {
                self.skip_whitespace();
                let operand = self.parse_term()?;
                // fold a pure operator over a known operand immediately
                if op.is_pure() {
                    if let Some(value) = operand.as_constant() {
                        return Ok(Value::Literal(op.apply(value)));
                    }
                }
                Ok(Value::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            LeadingToken::Function(function) => {
                let args = self.parse_argument_list(function.arg_count())?;
                Ok(Value::call(function, args))
            }
        }
    }

    /// Parses exactly `count` comma-separated arguments between parentheses.
    /// A wrong number of commas before the closing parenthesis is a compile
    /// error here, never a runtime check.
    fn parse_argument_list(&mut self, count: usize) -> Result<Vec<Value>, CompileError> {
        self.expect_char('(')?;
        self.skip_whitespace();
        if count == 0 {
            self.expect_char(')')?;
            return Ok(Vec::new());
        }
        let mut args = Vec::with_capacity(count);
        args.push(self.parse_expression()?);
        for _ in 1..count {
            self.expect_char(',')?;
            self.skip_whitespace();
            args.push(self.parse_expression()?);
        }
        self.expect_char(')')?;
        Ok(args)
    }
}

/// Reduces a left-to-right stream of values and binary operators into one
/// tree, honoring operator priority with an operator stack and an operand
/// stack. Equal priorities reduce left-to-right. Each reduction folds into a
/// literal when both operands are compile-time constants.
struct ShuntingYard {
    operators: Vec<BinaryOp>,
    operands: Vec<Value>,
}

impl ShuntingYard {
    fn new() -> Self {
        Self {
            operators: Vec::new(),
            operands: Vec::new(),
        }
    }

    fn add_value(&mut self, value: Value) {
        self.operands.push(value);
    }

    fn add_operator(&mut self, op: BinaryOp) {
        while matches!(self.operators.last(), Some(top) if op.priority() <= top.priority()) {
            self.reduce();
        }
        self.operators.push(op);
    }

    fn finish(mut self) -> Value {
        while self.operands.len() > 1 {
            self.reduce();
        }
        self.operands.pop().unwrap()
    }

    // Invariant: whenever more than one operand is on the stack, at least one
    // operator is pending, and every reduction consumes one of each.
    fn reduce(&mut self) {
        let op = self.operators.pop().unwrap();
        let right = self.operands.pop().unwrap();
        let left = self.operands.pop().unwrap();
        let reduced = match (left.as_constant(), right.as_constant()) {
            (Some(a), Some(b)) => Value::Literal(op.apply(a, b)),
            _ => Value::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        };
        self.operands.push(reduced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompileErrorKind;

    fn parse_default(text: &str) -> Result<Value, CompileError> {
        parse(text, &ExpressionEnv::new())
    }

    fn eval(text: &str) -> f64 {
        parse_default(text).unwrap().evaluate(&[])
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("6/2*1+2"), 5.0);
        assert_eq!(eval("6/2*(1+2)"), 9.0);
        assert_eq!(eval("2^3"), 8.0);
        assert_eq!(eval("1-(2)*3"), -5.0);
    }

    #[test]
    fn test_adjacent_unary_operators() {
        assert_eq!(eval("1--1"), 2.0);
        assert_eq!(eval("--1"), 1.0);
        assert_eq!(eval("-1"), -1.0);
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(eval("1 + 1"), 2.0);
        assert_eq!(eval("            1      +       1       "), 2.0);
        assert_eq!(eval("    1     --    1"), 2.0);
    }

    #[test]
    fn test_constant_folding_produces_literal_root() {
        let root = parse_default("2+2").unwrap();
        assert!(matches!(root, Value::Literal(v) if v == 4.0));
        assert_eq!(root.to_string(), "4.0");

        let folded_unary = parse_default("-(3)").unwrap();
        assert!(matches!(folded_unary, Value::Literal(v) if v == -3.0));
    }

    #[test]
    fn test_impure_operator_is_never_folded() {
        let root = parse_default("rand1000000").unwrap();
        assert!(matches!(root, Value::Unary { .. }));
    }

    #[test]
    fn test_variable_trees_are_not_folded() {
        let root = parse_default("$1 + 2").unwrap();
        assert!(matches!(root, Value::Binary { .. }));
        assert_eq!(root.evaluate(&[5.0]), 7.0);
    }

    #[test]
    fn test_scientific_notation_operator() {
        assert_eq!(eval("2E7"), 2e7);
    }

    #[test]
    fn test_longest_match_tokenization() {
        assert_eq!(eval("sinh(0)"), 0.0);
        assert_eq!(eval("1 != 2 & 3 != 4"), 1.0);
    }

    #[test]
    fn test_anonymous_variable_indices() {
        assert!(matches!(
            parse_default("$2").unwrap(),
            Value::Variable(1)
        ));
        for bad in ["$0", "$", "$-1", "$1.5", "$9999999999999999999"] {
            let err = parse_default(bad).unwrap_err();
            assert_eq!(
                *err.kind(),
                CompileErrorKind::InvalidVariableIndex,
                "expected invalid index for {bad}"
            );
        }
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            *parse_default("(").unwrap_err().kind(),
            CompileErrorKind::UnexpectedEnd
        ));
        assert!(matches!(
            *parse_default(")").unwrap_err().kind(),
            CompileErrorKind::ExpectedValue
        ));
        assert!(matches!(
            *parse_default("+").unwrap_err().kind(),
            CompileErrorKind::ExpectedValue
        ));
        assert!(matches!(
            *parse_default("").unwrap_err().kind(),
            CompileErrorKind::UnexpectedEnd
        ));
        let err = parse_default("1 1").unwrap_err();
        assert_eq!(*err.kind(), CompileErrorKind::ExpectedBinaryOperator);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_default("(1+2").is_err());
        assert!(parse_default("1+2)").is_err());
    }

    #[test]
    fn test_function_arity_is_a_compile_error() {
        let mut env = ExpressionEnv::new();
        env.add_function("mult", 2, |args| args[0] * args[1]).unwrap();
        assert!(parse("mult(1, 2)", &env).is_ok());
        assert!(matches!(
            *parse("mult(1)", &env).unwrap_err().kind(),
            CompileErrorKind::ExpectedChar(',')
        ));
        assert!(matches!(
            *parse("mult(1, 2, 3)", &env).unwrap_err().kind(),
            CompileErrorKind::ExpectedChar(')')
        ));
        assert!(matches!(
            *parse("mult", &env).unwrap_err().kind(),
            CompileErrorKind::ExpectedChar('(')
        ));
    }

    #[test]
    fn test_zero_arity_function_still_requires_parentheses() {
        let mut env = ExpressionEnv::new();
        env.add_function("four", 0, |_| 4.0).unwrap();
        assert_eq!(parse("four()", &env).unwrap().evaluate(&[]), 4.0);
        assert!(parse("four(1)", &env).is_err());
    }

    #[test]
    fn test_implicit_multiplication_is_rejected() {
        assert!(parse_default("3(4)").is_err());
    }
}
