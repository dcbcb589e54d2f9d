use std::rc::Rc;

use crate::consts::{NUMERIC_LITERALS, TEXT_LITERALS, TEXT_QUANTITIES};
use crate::lang::{BinOpKinds, SourceKinds, Term, UnaryOpKinds, Value};

/// A closed grammar: the operator tables the synthesizer grows with, the
/// terminal terms it starts from, and the canonical rendering of a term.
/// The synthesizer never inspects operator semantics directly.
pub trait Grammar {
    fn name(&self) -> &'static str;

    /// Unary combinators, excluding sources and literals.
    fn unary_ops(&self) -> &'static [UnaryOpKinds];

    fn binary_ops(&self) -> &'static [BinOpKinds];

    fn source_name(&self, source: SourceKinds) -> &'static str;

    /// Initial candidate pool: one source term per distinct input shape seen
    /// across the examples, followed by the fixed literal pool.
    fn terminals(&self, inputs: &[Value]) -> Vec<Rc<Term>>;

    /// Canonical program text. Total for any well-formed term.
    fn print(&self, term: &Term) -> String {
        match term {
            Term::Source(source) => self.source_name(*source).to_string(),
            Term::Lit(Value::Num(n)) => n.to_string(),
            Term::Lit(Value::Str(s)) => s.clone(),
            Term::Lit(value) => value.to_string(),
            Term::Unary(op, child) => format!("{}({})", op, self.print(child)),
            Term::Binary(op, left, right) if op.is_infix() => {
                format!("({} {} {})", self.print(left), op, self.print(right))
            }
            Term::Binary(op, left, right) => {
                format!("{}({}, {})", op, self.print(left), self.print(right))
            }
        }
    }
}

/// Arithmetic over a single numeric input.
pub struct NumericGrammar;

impl Grammar for NumericGrammar {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn unary_ops(&self) -> &'static [UnaryOpKinds] {
        &[]
    }

    fn binary_ops(&self) -> &'static [BinOpKinds] {
        use BinOpKinds::*;
        &[Add, Mul, Div, Sub]
    }

    fn source_name(&self, source: SourceKinds) -> &'static str {
        match source {
            SourceKinds::Input | SourceKinds::InputY => "y",
            SourceKinds::InputX => "x",
        }
    }

    fn terminals(&self, _inputs: &[Value]) -> Vec<Rc<Term>> {
        std::iter::once(Rc::new(Term::Source(SourceKinds::Input)))
            .chain(
                NUMERIC_LITERALS
                    .iter()
                    .map(|&n| Rc::new(Term::Lit(Value::Num(n)))),
            )
            .collect()
    }
}

/// String transformations over a scalar string input or an ordered pair of
/// string inputs.
pub struct TextualGrammar;

impl Grammar for TextualGrammar {
    fn name(&self) -> &'static str {
        "textual"
    }

    fn unary_ops(&self) -> &'static [UnaryOpKinds] {
        use UnaryOpKinds::*;
        &[Upper, Lower, Trim]
    }

    fn binary_ops(&self) -> &'static [BinOpKinds] {
        use BinOpKinds::*;
        &[Concat, Left, Right]
    }

    fn source_name(&self, source: SourceKinds) -> &'static str {
        match source {
            SourceKinds::Input | SourceKinds::InputX => "Input(x)",
            SourceKinds::InputY => "Input(y)",
        }
    }

    fn terminals(&self, inputs: &[Value]) -> Vec<Rc<Term>> {
        let mut terminals = Vec::new();

        if inputs
            .iter()
            .any(|v| matches!(v, Value::Num(_) | Value::Str(_)))
        {
            terminals.push(Rc::new(Term::Source(SourceKinds::Input)));
        }
        if inputs.iter().any(|v| matches!(v, Value::Pair(..))) {
            terminals.push(Rc::new(Term::Source(SourceKinds::InputX)));
            terminals.push(Rc::new(Term::Source(SourceKinds::InputY)));
        }

        for &s in TEXT_LITERALS {
            terminals.push(Rc::new(Term::Lit(Value::from(s))));
        }
        for &n in TEXT_QUANTITIES {
            terminals.push(Rc::new(Term::Lit(Value::Num(n))));
        }

        terminals
    }
}
