use nameof::name_of;
use std::collections::HashMap;

use super::{benchmarks, Benchmark, GrammarKind};
use exemplar::lang::Value;
use exemplar::syn::SearchBudget;

pub fn benchmarks() -> HashMap<&'static str, Benchmark> {
    benchmarks![
        constant_one,
        double,
        quadruple,
        increment,
        increment_two,
        negate,
        negate_double
    ]
}

fn numeric(inputs: &[i32], outputs: &[i32], rounds: usize) -> Benchmark {
    Benchmark {
        grammar: GrammarKind::Numeric,
        inputs: inputs.iter().map(|&n| Value::Num(n)).collect(),
        outputs: outputs.iter().map(|&n| Value::Num(n)).collect(),
        budget: SearchBudget::rounds(rounds),
        solvable: Some(true),
    }
}

/* 1 */
fn constant_one() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[1, 1, 1, 1, 1], 1)
}

/* (y + y) */
fn double() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[2, 4, 6, 8, 10], 1)
}

/* (y x (2 + 2)) */
fn quadruple() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[4, 8, 12, 16, 20], 2)
}

/* (y + 1) */
fn increment() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[2, 3, 4, 5, 6], 1)
}

/* (y + 2) */
fn increment_two() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[3, 4, 5, 6, 7], 1)
}

/* (y x -1) */
fn negate() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[-1, -2, -3, -4, -5], 1)
}

/* (0 - (y + y)) */
fn negate_double() -> Benchmark {
    numeric(&[1, 2, 3, 4, 5], &[-2, -4, -6, -8, -10], 2)
}
