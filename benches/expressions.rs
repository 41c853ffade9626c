//! Expression Evaluation Benchmarks
//!
//! This benchmark suite compares the performance of compiled expressions
//! against direct Rust implementations. It measures both steady-state
//! evaluation speed and compilation time to show the overhead and benefits of
//! compiling expressions once and evaluating them many times.
//!
//! ## Benchmark Structure
//!
//! ### 1. Expression Evaluation (`benchmark_expressions`)
//! Compares the runtime performance of evaluating expressions using:
//! - **Direct Evaluation**: Hand-written Rust functions that directly compute
//!   the result
//! - **Compiled Evaluation**: Expressions compiled once into an evaluation
//!   tree, then evaluated through the fixed-arity entry points
//!
//! Compilation overhead is excluded from these measurements since all
//! expressions are pre-compiled during setup, so the numbers reflect the
//! steady-state cost per call.
//!
//! ### 2. Compilation Time (`benchmark_compilation_time`)
//! Measures the time required to tokenize, parse, and constant-fold
//! expressions from string form. This is the one-time setup cost paid before
//! the first evaluation.
//!
//! ## Usage
//!
//! Run with: `cargo bench --bench expressions`

use std::{f64::consts::PI, hint::black_box};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fastexpr::{compile, CompiledExpression};

/// Direct evaluation of the benchmark expressions
///
/// Hand-written Rust implementations serving as the baseline against the
/// compiled versions.
struct DirectEvaluator;

impl DirectEvaluator {
    /// Evaluates: $1 + 1.1
    fn evaluate_simple_add(a: f64) -> f64 {
        a + 1.1
    }

    /// Evaluates: 2.2 * $1 + 1.1
    fn evaluate_linear(a: f64) -> f64 {
        2.2 * a + 1.1
    }

    /// Evaluates: (2.2 * $1 + 1.1) * 3.3
    fn evaluate_quadratic(a: f64) -> f64 {
        (2.2 * a + 1.1) * 3.3
    }

    /// Evaluates: $1^2 / (2 * pi / $2) - $1 / 2.2
    fn evaluate_polynomial(a: f64, b: f64) -> f64 {
        a * a / (2.0 * PI / b) - a / 2.2
    }

    /// Evaluates: ($1^3 + 2*$1^2 - 5*$1 + 1) / ($2^2 + 3*$2 + 2)
    fn evaluate_complex_poly(a: f64, b: f64) -> f64 {
        (a * a * a + 2.0 * a * a - 5.0 * a + 1.0) / (b * b + 3.0 * b + 2.0)
    }

    /// Evaluates: sqrt(1 - 2.2*$1 + pi/$2/3.3)
    fn evaluate_sqrt_expr(a: f64, b: f64) -> f64 {
        (1.0 - 2.2 * a + PI / b / 3.3).sqrt()
    }

    /// Evaluates: abs(sin($1) * cos($2)) + $1 % $2
    fn evaluate_trig_expr(a: f64, b: f64) -> f64 {
        (a.sin() * b.cos()).abs() + a % b
    }
}

const EXPRESSIONS: [(&str, &str, usize); 7] = [
    ("simple_add", "$1 + 1.1", 1),
    ("linear", "2.2 * $1 + 1.1", 1),
    ("quadratic", "(2.2 * $1 + 1.1) * 3.3", 1),
    ("polynomial", "$1^2 / (2 * pi / $2) - $1 / 2.2", 2),
    (
        "complex_poly",
        "($1^3 + 2*$1^2 - 5*$1 + 1) / ($2^2 + 3*$2 + 2)",
        2,
    ),
    ("sqrt_expr", "sqrt(1 - 2.2*$1 + pi/$2/3.3)", 2),
    ("trig_expr", "abs(sin($1) * cos($2)) + $1 % $2", 2),
];

/// Benchmarks steady-state expression evaluation
///
/// Compares direct Rust implementations against pre-compiled expressions.
/// Each compiled expression is evaluated through the entry point matching its
/// arity, which overwrites the owned value buffer in place.
fn benchmark_expressions(c: &mut Criterion) {
    let mut compiled: Vec<CompiledExpression> = EXPRESSIONS
        .iter()
        .map(|(name, text, _)| {
            compile(text).unwrap_or_else(|e| panic!("failed to compile {name}: {e}"))
        })
        .collect();

    let a = 2.5;
    let b = 1.8;

    let mut group = c.benchmark_group("Expression Evaluation");

    for (i, (name, _text, arity)) in EXPRESSIONS.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new("Direct", name), &i, |bench, &idx| {
            bench.iter(|| {
                let result = match idx {
                    0 => DirectEvaluator::evaluate_simple_add(black_box(a)),
                    1 => DirectEvaluator::evaluate_linear(black_box(a)),
                    2 => DirectEvaluator::evaluate_quadratic(black_box(a)),
                    3 => DirectEvaluator::evaluate_polynomial(black_box(a), black_box(b)),
                    4 => DirectEvaluator::evaluate_complex_poly(black_box(a), black_box(b)),
                    5 => DirectEvaluator::evaluate_sqrt_expr(black_box(a), black_box(b)),
                    6 => DirectEvaluator::evaluate_trig_expr(black_box(a), black_box(b)),
                    _ => unreachable!(),
                };
                black_box(result)
            })
        });

        let expr = &mut compiled[i];
        match arity {
            1 => {
                group.bench_with_input(BenchmarkId::new("Compiled", name), &a, |bench, &a| {
                    bench.iter(|| black_box(expr.evaluate_1(black_box(a)).unwrap()))
                });
            }
            2 => {
                group.bench_with_input(
                    BenchmarkId::new("Compiled", name),
                    &(a, b),
                    |bench, &(a, b)| {
                        bench.iter(|| {
                            black_box(expr.evaluate_2(black_box(a), black_box(b)).unwrap())
                        })
                    },
                );
            }
            _ => unreachable!(),
        }
    }

    group.finish();
}

/// Benchmarks compilation time
///
/// Measures the time to tokenize, parse, and constant-fold each expression
/// from its string form. This is the one-time cost paid before any
/// evaluation.
fn benchmark_compilation_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compilation Time");

    for (name, text, _) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::new("Compile", name), text, |bench, text| {
            bench.iter(|| black_box(compile(black_box(text))))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_expressions, benchmark_compilation_time);
criterion_main!(benches);
