use nameof::name_of;
use std::collections::HashMap;

use super::{benchmarks, Benchmark, GrammarKind};
use exemplar::lang::Value;
use exemplar::syn::SearchBudget;

pub fn benchmarks() -> HashMap<&'static str, Benchmark> {
    benchmarks![
        first_char,
        last_char,
        join_pair,
        join_pair_spaced,
        initials,
        trim_blank
    ]
}

fn textual(inputs: Vec<Value>, outputs: &[&str], rounds: usize) -> Benchmark {
    Benchmark {
        grammar: GrammarKind::Textual,
        inputs,
        outputs: outputs.iter().map(|&s| Value::from(s)).collect(),
        budget: SearchBudget::rounds(rounds),
        solvable: Some(true),
    }
}

fn scalars(inputs: &[&str]) -> Vec<Value> {
    inputs.iter().map(|&s| Value::from(s)).collect()
}

fn pairs(inputs: &[(&str, &str)]) -> Vec<Value> {
    inputs.iter().map(|&p| Value::from(p)).collect()
}

/* Left(Input(x), 1) */
fn first_char() -> Benchmark {
    textual(scalars(&["hello", "world"]), &["h", "w"], 1)
}

/* Right(Input(x), 1) */
fn last_char() -> Benchmark {
    textual(scalars(&["hello", "world"]), &["o", "d"], 1)
}

/* Concat(Input(x), Input(y)) */
fn join_pair() -> Benchmark {
    textual(
        pairs(&[("hello", "you"), ("world", "domination")]),
        &["helloyou", "worlddomination"],
        1,
    )
}

/* joining around the blank literal is three rounds out; the third growth
round overruns the default pool bound */
fn join_pair_spaced() -> Benchmark {
    Benchmark {
        solvable: Some(false),
        ..textual(
            pairs(&[("hello", "you"), ("world", "domination")]),
            &["hello you", "world domination"],
            3,
        )
    }
}

/* Concat(Left(Input(x), 1), Right(Input(x), 1)) */
fn initials() -> Benchmark {
    textual(scalars(&["hello", "world", "domination"]), &["ho", "wd", "dn"], 2)
}

/* Trim(Input(x)) */
fn trim_blank() -> Benchmark {
    textual(scalars(&[" ", " hello world   "]), &["", "hello world"], 1)
}
