use core::fmt;
use std::rc::Rc;

mod eval;
mod grammar;
pub mod json;
pub mod macros;

pub use eval::{evaluate, EvalError};
pub use grammar::{Grammar, NumericGrammar, TextualGrammar};

/// A concrete value: one example's input or the result of evaluating a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Num(i32),
    Str(String),

    /// Two-element ordered input for two-argument grammars.
    Pair(String, String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;

        match self {
            Num(n) => write!(f, "{}", n),
            Str(s) => write!(f, "\"{}\"", s),
            Pair(x, y) => write!(f, "(\"{}\", \"{}\")", x, y),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Num(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<(&str, &str)> for Value {
    fn from((x, y): (&str, &str)) -> Self {
        Value::Pair(x.to_string(), y.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKinds {
    Add,
    Mul,
    Div,
    Sub,

    Concat,
    /// Leftmost-n-characters slice; right operand is the length.
    Left,
    /// Rightmost-n-characters slice; right operand is the length.
    Right,
}

impl BinOpKinds {
    /// Arithmetic operators render infix; the string operators render as calls.
    pub fn is_infix(self) -> bool {
        use BinOpKinds::*;
        matches!(self, Add | Mul | Div | Sub)
    }
}

impl fmt::Display for BinOpKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinOpKinds::*;

        let op = match self {
            Add => "+",
            Mul => "x",
            Div => "/",
            Sub => "-",
            Concat => "Concat",
            Left => "Left",
            Right => "Right",
        };

        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKinds {
    Upper,
    Lower,
    Trim,
}

impl fmt::Display for UnaryOpKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UnaryOpKinds::*;

        let op = match self {
            Upper => "Upper",
            Lower => "Lower",
            Trim => "Trim",
        };

        write!(f, "{}", op)
    }
}

/// Nullary terms that read from the example input instead of combining
/// sub-terms. Never applied as growth operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKinds {
    /// The whole input.
    Input,
    /// First component of a paired input.
    InputX,
    /// Second component of a paired input.
    InputY,
}

/// One node of the grammar. Each variant carries exactly the operand shape
/// its arity class needs; sub-terms are shared, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Source(SourceKinds),
    Lit(Value),
    Unary(UnaryOpKinds, Rc<Term>),
    Binary(BinOpKinds, Rc<Term>, Rc<Term>),
}

/// Operator tag for data-driven construction through [`Term::construct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Input,
    InputX,
    InputY,
    Identity,
    Quantity,
    Unary(UnaryOpKinds),
    Binary(BinOpKinds),
}

impl Op {
    pub fn shape(self) -> OperandShape {
        match self {
            Op::Input | Op::InputX | Op::InputY => OperandShape::Nullary,
            Op::Identity | Op::Quantity => OperandShape::Literal,
            Op::Unary(_) => OperandShape::Unary,
            Op::Binary(_) => OperandShape::Binary,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Input => write!(f, "input"),
            Op::InputX => write!(f, "input_x"),
            Op::InputY => write!(f, "input_y"),
            Op::Identity => write!(f, "identity"),
            Op::Quantity => write!(f, "quantity"),
            Op::Unary(op) => write!(f, "{}", op),
            Op::Binary(op) => write!(f, "{}", op),
        }
    }
}

/// Operands supplied to [`Term::construct`].
#[derive(Debug, Clone)]
pub enum Operands {
    None,
    Lit(Value),
    Child(Rc<Term>),
    Pair(Rc<Term>, Rc<Term>),
}

impl Operands {
    pub fn shape(&self) -> OperandShape {
        match self {
            Operands::None => OperandShape::Nullary,
            Operands::Lit(_) => OperandShape::Literal,
            Operands::Child(_) => OperandShape::Unary,
            Operands::Pair(..) => OperandShape::Binary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    Nullary,
    Literal,
    Unary,
    Binary,
}

impl fmt::Display for OperandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            OperandShape::Nullary => "no operands",
            OperandShape::Literal => "a literal",
            OperandShape::Unary => "one sub-term",
            OperandShape::Binary => "left and right sub-terms",
        };

        write!(f, "{}", shape)
    }
}

/// The operands supplied do not match the operator's declared arity class.
#[derive(Debug, Clone, PartialEq)]
pub struct ArityError {
    pub op: Op,
    pub expected: OperandShape,
    pub got: OperandShape,
}

impl fmt::Display for ArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operator {} expects {} but was given {}",
            self.op, self.expected, self.got
        )
    }
}

impl Term {
    /// Build a term from an operator tag plus operands, checking that the
    /// operand shape matches the operator's arity class. Callers that know
    /// the operator statically construct the variants directly instead.
    pub fn construct(op: Op, operands: Operands) -> Result<Term, ArityError> {
        match (op, operands) {
            (Op::Input, Operands::None) => Ok(Term::Source(SourceKinds::Input)),
            (Op::InputX, Operands::None) => Ok(Term::Source(SourceKinds::InputX)),
            (Op::InputY, Operands::None) => Ok(Term::Source(SourceKinds::InputY)),
            (Op::Identity | Op::Quantity, Operands::Lit(value)) => Ok(Term::Lit(value)),
            (Op::Unary(op), Operands::Child(child)) => Ok(Term::Unary(op, child)),
            (Op::Binary(op), Operands::Pair(left, right)) => Ok(Term::Binary(op, left, right)),

            (op, operands) => Err(ArityError {
                op,
                expected: op.shape(),
                got: operands.shape(),
            }),
        }
    }

    pub fn size(&self) -> usize {
        self.into_iter().count()
    }
}

impl<'a> IntoIterator for &'a Term {
    type Item = &'a Term;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    /// Returns an iterator over the term tree.
    fn into_iter(self) -> Self::IntoIter {
        let mut terms = vec![];

        // dfs over the term tree
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            terms.push(term);

            match term {
                Term::Unary(_, child) => stack.push(child.as_ref()),
                Term::Binary(_, left, right) => stack.extend(&[left.as_ref(), right.as_ref()]),
                _ => {}
            }
        }

        terms.into_iter()
    }
}
