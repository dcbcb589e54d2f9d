use core::fmt;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::consts::{DEFAULT_MAX_POOL, DEFAULT_MAX_ROUNDS};
use crate::lang::{evaluate, EvalError, Grammar, Term, Value};
use bitflags::bitflags;
use itertools::Itertools;
use tracing::{event, Level};

/// The search bound was exhausted before a consistent program was found.
/// Evaluation failures inside the search are recovered silently; this is the
/// only failure a caller sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisFailure {
    BoundExhausted { rounds: usize, pool_size: usize },
}

impl fmt::Display for SynthesisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisFailure::BoundExhausted { rounds, pool_size } => write!(
                f,
                "no consistent program within bound ({} rounds, {} candidates)",
                rounds, pool_size
            ),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct SynthesisFeatures: u8 {
        const None = 0b00;

        /// Parsimony ordering: stable-sort the pool by printed length so the
        /// shortest member of an equivalence class survives pruning and the
        /// shortest consistent candidate is found first
        const Sort = 0b01;

        /// Observational-equivalence pruning of the candidate pool
        const Prune = 0b10;
    }
}

impl Default for SynthesisFeatures {
    fn default() -> Self {
        SynthesisFeatures::all()
    }
}

/// Explicit search bound threaded through [`Synthesizer::synthesize`]. Pool
/// growth is quadratic per round and compounds; there is no termination
/// guarantee without one of these limits.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    pub max_rounds: usize,
    pub max_pool: Option<usize>,
    pub timeout: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_pool: Some(DEFAULT_MAX_POOL),
            timeout: None,
        }
    }
}

impl SearchBudget {
    pub fn rounds(max_rounds: usize) -> Self {
        SearchBudget {
            max_rounds,
            ..Default::default()
        }
    }
}

fn signature(term: &Term, inputs: &[Value]) -> Result<Vec<Value>, EvalError> {
    inputs.iter().map(|input| evaluate(term, input)).collect()
}

/// Bottom-up enumerative search for a term consistent with every example.
pub struct Synthesizer<'a, G> {
    grammar: &'a G,
    inputs: &'a [Value],
    outputs: &'a [Value],
    features: SynthesisFeatures,
    pool: Vec<Rc<Term>>,
}

impl<'a, G: Grammar> Synthesizer<'a, G> {
    /// `inputs[i]` and `outputs[i]` correspond positionally; mismatched or
    /// empty example lists are a caller contract violation.
    pub fn new(
        grammar: &'a G,
        inputs: &'a [Value],
        outputs: &'a [Value],
        features: SynthesisFeatures,
    ) -> Self {
        assert_eq!(
            inputs.len(),
            outputs.len(),
            "every example input needs a matching output"
        );
        assert!(!inputs.is_empty(), "at least one example is required");

        let pool = grammar.terminals(inputs);
        event!(
            Level::DEBUG,
            grammar = grammar.name(),
            terminals = pool.len(),
            "initialized candidate pool"
        );

        Synthesizer {
            grammar,
            inputs,
            outputs,
            features,
            pool,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Pool size one growth round from now. Growth is refused, not undone,
    /// when this would overrun the pool bound.
    fn projected_growth(&self) -> usize {
        let n = self.pool.len();
        n + n * self.grammar.unary_ops().len()
            + n * (n + 1) / 2 * self.grammar.binary_ops().len()
    }

    /// One growth round: apply every unary combinator to every candidate and
    /// every binary operator to every unordered pair of candidates (pairs may
    /// repeat an element; the left operand comes from the earlier pool
    /// position). Appends only, so the pool never shrinks here.
    pub fn grow(&mut self) {
        let before = self.pool.len();
        let mut fresh = Vec::new();

        for term in &self.pool {
            for &op in self.grammar.unary_ops() {
                fresh.push(Rc::new(Term::Unary(op, Rc::clone(term))));
            }
        }

        for pair in (0..before).combinations_with_replacement(2) {
            let (left, right) = (&self.pool[pair[0]], &self.pool[pair[1]]);
            for &op in self.grammar.binary_ops() {
                fresh.push(Rc::new(Term::Binary(op, Rc::clone(left), Rc::clone(right))));
            }
        }

        self.pool.extend(fresh);
        event!(
            Level::DEBUG,
            before,
            after = self.pool.len(),
            "grew candidate pool"
        );
    }

    /// Stable sort by printed length, ascending; ties keep insertion order.
    pub fn sort(&mut self) {
        let grammar = self.grammar;
        self.pool.sort_by_cached_key(|term| grammar.print(term).len());
    }

    /// Keep the first candidate of every output-signature class and drop the
    /// rest. Candidates that fail evaluation on any example have no signature:
    /// they are carried forward unpruned and never grouped against.
    pub fn prune(&mut self) {
        let before = self.pool.len();
        let inputs = self.inputs;

        let mut seen: HashSet<Vec<Value>> = HashSet::new();
        self.pool.retain(|term| match signature(term, inputs) {
            Err(_) => true,
            Ok(signature) => seen.insert(signature),
        });

        event!(
            Level::DEBUG,
            before,
            after = self.pool.len(),
            "pruned observational duplicates"
        );
    }

    fn matches(&self, term: &Term) -> bool {
        self.inputs
            .iter()
            .zip(self.outputs)
            .all(|(input, output)| evaluate(term, input).is_ok_and(|value| value == *output))
    }

    /// Search for a term whose evaluation reproduces every example output.
    /// Candidates that fail evaluation during the scan are non-matches, not
    /// aborts.
    pub fn synthesize_term(&mut self, budget: &SearchBudget) -> Result<Rc<Term>, SynthesisFailure> {
        let deadline = budget.timeout.map(|timeout| Instant::now() + timeout);

        for round in 1..=budget.max_rounds {
            if let Some(max_pool) = budget.max_pool {
                let projected = self.projected_growth();
                if projected > max_pool {
                    event!(
                        Level::INFO,
                        round,
                        projected,
                        max_pool,
                        "growth would overrun the pool bound"
                    );
                    return Err(SynthesisFailure::BoundExhausted {
                        rounds: round - 1,
                        pool_size: self.pool.len(),
                    });
                }
            }

            self.grow();
            if self.features.contains(SynthesisFeatures::Sort) {
                self.sort();
            }
            if self.features.contains(SynthesisFeatures::Prune) {
                self.prune();
            }

            event!(
                Level::INFO,
                round,
                pool_size = self.pool.len(),
                "scanning candidates"
            );
            if let Some(term) = self.pool.iter().find(|term| self.matches(term)) {
                let term = Rc::clone(term);
                event!(
                    Level::INFO,
                    round,
                    program = self.grammar.print(&term),
                    "found consistent program"
                );
                return Ok(term);
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(SynthesisFailure::BoundExhausted {
                    rounds: round,
                    pool_size: self.pool.len(),
                });
            }
        }

        Err(SynthesisFailure::BoundExhausted {
            rounds: budget.max_rounds,
            pool_size: self.pool.len(),
        })
    }

    /// Like [`Self::synthesize_term`], but returns the program's canonical
    /// printed form.
    pub fn synthesize(&mut self, budget: &SearchBudget) -> Result<String, SynthesisFailure> {
        self.synthesize_term(budget)
            .map(|term| self.grammar.print(&term))
    }
}

/// Search `grammar` for a program mapping every `inputs[i]` to `outputs[i]`
/// exactly, returning its canonical printed form.
pub fn synthesize<G: Grammar>(
    grammar: &G,
    inputs: &[Value],
    outputs: &[Value],
    budget: &SearchBudget,
    features: SynthesisFeatures,
) -> Result<String, SynthesisFailure> {
    Synthesizer::new(grammar, inputs, outputs, features).synthesize(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{macros::*, NumericGrammar, TextualGrammar};

    fn nums(ns: &[i32]) -> Vec<Value> {
        ns.iter().map(|&n| Value::Num(n)).collect()
    }

    fn strs(ss: &[&str]) -> Vec<Value> {
        ss.iter().map(|&s| Value::from(s)).collect()
    }

    fn assert_consistent(term: &Term, inputs: &[Value], outputs: &[Value]) {
        for (input, output) in inputs.iter().zip(outputs) {
            assert_eq!(evaluate(term, input), Ok(output.clone()));
        }
    }

    #[test_log::test]
    fn test_finds_double() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[2, 4, 6, 8, 10]);

        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());
        let term = synth.synthesize_term(&SearchBudget::rounds(2)).unwrap();

        assert_consistent(&term, &inputs, &outputs);
        assert_eq!(NumericGrammar.print(&term), "(y + y)");
    }

    #[test_log::test]
    fn test_finds_negation() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[-1, -2, -3, -4, -5]);

        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());
        let term = synth.synthesize_term(&SearchBudget::rounds(2)).unwrap();

        assert_consistent(&term, &inputs, &outputs);
        assert_eq!(NumericGrammar.print(&term), "(y x -1)");
    }

    #[test_log::test]
    fn test_finds_constant() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[1, 1, 1, 1, 1]);

        let program = synthesize(
            &NumericGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        )
        .unwrap();
        assert_eq!(program, "1");
    }

    #[test_log::test]
    fn test_finds_increment() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[2, 3, 4, 5, 6]);

        let program = synthesize(
            &NumericGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        )
        .unwrap();
        assert_eq!(program, "(y + 1)");
    }

    #[test_log::test]
    fn test_finds_doubled_negation() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[-2, -4, -6, -8, -10]);

        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());
        let term = synth.synthesize_term(&SearchBudget::rounds(2)).unwrap();
        assert_consistent(&term, &inputs, &outputs);
    }

    #[test_log::test]
    fn test_finds_first_char() {
        let inputs = strs(&["hello", "world"]);
        let outputs = strs(&["h", "w"]);

        let program = synthesize(
            &TextualGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        )
        .unwrap();
        assert_eq!(program, "Left(Input(x), 1)");
    }

    #[test_log::test]
    fn test_finds_trim() {
        let inputs = strs(&[" ", " hello world   "]);
        let outputs = strs(&["", "hello world"]);

        let program = synthesize(
            &TextualGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        )
        .unwrap();
        assert_eq!(program, "Trim(Input(x))");
    }

    #[test_log::test]
    fn test_finds_pair_concat() {
        let inputs = vec![
            Value::from(("hello", "you")),
            Value::from(("world", "domination")),
        ];
        let outputs = strs(&["helloyou", "worlddomination"]);

        let program = synthesize(
            &TextualGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        )
        .unwrap();
        assert_eq!(program, "Concat(Input(x), Input(y))");
    }

    #[test_log::test]
    fn test_finds_initials() {
        let inputs = strs(&["hello", "world", "domination"]);
        let outputs = strs(&["ho", "wd", "dn"]);

        let mut synth =
            Synthesizer::new(&TextualGrammar, &inputs, &outputs, Default::default());
        let term = synth.synthesize_term(&SearchBudget::rounds(2)).unwrap();
        assert_consistent(&term, &inputs, &outputs);
    }

    #[test]
    fn test_growth_is_monotone() {
        let inputs = nums(&[1, 2]);
        let outputs = nums(&[3, 4]);
        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());

        let mut previous = synth.pool_size();
        for _ in 0..2 {
            synth.grow();
            assert!(synth.pool_size() >= previous);
            previous = synth.pool_size();
        }
    }

    #[test]
    fn test_prune_dedups_by_signature() {
        let inputs = nums(&[1, 2, 3]);
        let outputs = nums(&[0, 0, 0]);
        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());

        // (y + 0) is observationally equivalent to y over any inputs
        synth.pool = vec![
            Rc::new(input!()),
            Rc::new(binary!(Add, input!(), lit!(0))),
            Rc::new(lit!(0)),
        ];
        synth.prune();

        assert_eq!(synth.pool.len(), 2);
        assert_eq!(synth.pool[0].as_ref(), &input!());
        assert_eq!(synth.pool[1].as_ref(), &lit!(0));
    }

    #[test]
    fn test_prune_keeps_failing_candidates() {
        // both divisions fail on the first example and share no signature
        let inputs = nums(&[0, 1]);
        let outputs = nums(&[1, 1]);
        let mut synth =
            Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());

        synth.pool = vec![
            Rc::new(binary!(Div, lit!(1), input!())),
            Rc::new(binary!(Div, lit!(2), input!())),
            Rc::new(lit!(1)),
            Rc::new(lit!(1)),
        ];
        synth.prune();

        assert_eq!(synth.pool.len(), 3);
    }

    #[test_log::test]
    fn test_bound_exhausted() {
        let inputs = nums(&[1]);
        let outputs = nums(&[1000]);

        let result = synthesize(
            &NumericGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            Default::default(),
        );
        assert!(
            result.is_err_and(|e| matches!(e, SynthesisFailure::BoundExhausted { rounds: 1, .. }))
        );
    }

    #[test_log::test]
    fn test_pool_bound_refuses_growth() {
        let inputs = nums(&[1]);
        let outputs = nums(&[1000]);
        let budget = SearchBudget {
            max_rounds: 10,
            max_pool: Some(10),
            timeout: None,
        };

        // the first growth round would already overrun the bound
        let result = synthesize(&NumericGrammar, &inputs, &outputs, &budget, Default::default());
        assert_eq!(
            result,
            Err(SynthesisFailure::BoundExhausted {
                rounds: 0,
                pool_size: 5,
            })
        );
    }

    #[test_log::test]
    fn test_ablated_search_still_finds_programs() {
        let inputs = nums(&[1, 2, 3, 4, 5]);
        let outputs = nums(&[2, 4, 6, 8, 10]);

        let program = synthesize(
            &NumericGrammar,
            &inputs,
            &outputs,
            &SearchBudget::rounds(1),
            SynthesisFeatures::None,
        )
        .unwrap();
        assert_eq!(program, "(y + y)");
    }

    #[test]
    #[should_panic(expected = "matching output")]
    fn test_mismatched_examples_panic() {
        let inputs = nums(&[1, 2]);
        let outputs = nums(&[1]);
        Synthesizer::new(&NumericGrammar, &inputs, &outputs, Default::default());
    }
}
