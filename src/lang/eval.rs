use core::fmt;

use crate::lang::{BinOpKinds, SourceKinds, Term, UnaryOpKinds, Value};

/// Evaluation-time failure. Recovered by the synthesizer, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    DivisionByZero,
    Overflow,
    InvalidOperands(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::Overflow => write!(f, "arithmetic overflow"),
            EvalError::InvalidOperands(msg) => write!(f, "{}", msg),
        }
    }
}

fn eval_binop(op: BinOpKinds, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    use BinOpKinds::*;
    use Value::*;

    match (op, lhs, rhs) {
        (Add, &Num(lhs), &Num(rhs)) => lhs.checked_add(rhs).map(Num).ok_or(EvalError::Overflow),
        (Sub, &Num(lhs), &Num(rhs)) => lhs.checked_sub(rhs).map(Num).ok_or(EvalError::Overflow),
        (Mul, &Num(lhs), &Num(rhs)) => lhs.checked_mul(rhs).map(Num).ok_or(EvalError::Overflow),
        (Div, &Num(_), &Num(0)) => Err(EvalError::DivisionByZero),
        (Div, &Num(lhs), &Num(rhs)) => lhs.checked_div(rhs).map(Num).ok_or(EvalError::Overflow),

        (Concat, Str(lhs), Str(rhs)) => Ok(Str(format!("{}{}", lhs, rhs))),
        (Left, Str(s), &Num(n)) => Ok(Str(slice_prefix(s, n))),
        (Right, Str(s), &Num(n)) => Ok(Str(slice_suffix(s, n))),

        _ => Err(EvalError::InvalidOperands(format!(
            "invalid operation: {lhs:?} {op} {rhs:?}"
        ))),
    }
}

fn eval_unaryop(op: UnaryOpKinds, value: &Value) -> Result<Value, EvalError> {
    use UnaryOpKinds::*;
    use Value::*;

    match (op, value) {
        (Upper, Str(s)) => Ok(Str(s.to_uppercase())),
        (Lower, Str(s)) => Ok(Str(s.to_lowercase())),
        (Trim, Str(s)) => Ok(Str(s.trim().to_string())),
        _ => Err(EvalError::InvalidOperands(format!(
            "invalid operation: {op} {value:?}"
        ))),
    }
}

/// `s[:n]` over characters: a negative length counts from the end,
/// out-of-range clamps to the whole string.
fn slice_prefix(s: &str, n: i32) -> String {
    let end = clamp_index(n as i64, s.chars().count());
    s.chars().take(end).collect()
}

/// `s[-n:]` over characters.
fn slice_suffix(s: &str, n: i32) -> String {
    let start = clamp_index(-(n as i64), s.chars().count());
    s.chars().skip(start).collect()
}

fn clamp_index(idx: i64, len: usize) -> usize {
    if idx < 0 {
        len.saturating_sub(idx.unsigned_abs() as usize)
    } else {
        (idx as usize).min(len)
    }
}

/// Evaluate a term against one example input, operands first. Stateless and
/// deterministic: the same term and input always yield the same result.
pub fn evaluate(term: &Term, input: &Value) -> Result<Value, EvalError> {
    match term {
        Term::Source(SourceKinds::Input) => Ok(input.clone()),
        Term::Source(SourceKinds::InputX) => match input {
            Value::Pair(x, _) => Ok(Value::Str(x.clone())),
            _ => Err(EvalError::InvalidOperands(format!(
                "input_x needs a paired input, got {input:?}"
            ))),
        },
        Term::Source(SourceKinds::InputY) => match input {
            Value::Pair(_, y) => Ok(Value::Str(y.clone())),
            _ => Err(EvalError::InvalidOperands(format!(
                "input_y needs a paired input, got {input:?}"
            ))),
        },

        Term::Lit(value) => Ok(value.clone()),

        Term::Unary(op, child) => eval_unaryop(*op, &evaluate(child, input)?),
        Term::Binary(op, left, right) => {
            eval_binop(*op, &evaluate(left, input)?, &evaluate(right, input)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::macros::*;
    use quickcheck::quickcheck;
    use rstest::rstest;

    #[derive(Debug, Copy, Clone)]
    struct SmallNumber(i32);

    impl quickcheck::Arbitrary for SmallNumber {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            SmallNumber(i32::arbitrary(g) % 10000)
        }
    }

    macro_rules! eval_binop_num_tests {
        ($($test_name:ident: ($x:path, $op:tt),)*) => {
            $(
                quickcheck! {
                    fn $test_name(lhs: SmallNumber, rhs: SmallNumber) -> bool {
                        let SmallNumber(lhs) = lhs;
                        let SmallNumber(rhs) = rhs;

                        let expected =
                            if $x == BinOpKinds::Div && rhs == 0 { Err(EvalError::DivisionByZero) }
                            else { Ok(Value::Num(lhs $op rhs)) };
                        eval_binop($x, &lhs.into(), &rhs.into()) == expected
                    }
                }
            )*
        };
    }

    eval_binop_num_tests! {
        test_binop_add: (BinOpKinds::Add, +),
        test_binop_sub: (BinOpKinds::Sub, -),
        test_binop_mul: (BinOpKinds::Mul, *),
        test_binop_div: (BinOpKinds::Div, /),
    }

    quickcheck! {
        fn test_evaluate_deterministic(n: SmallNumber) -> bool {
            let term = binary!(Mul, binary!(Add, input!(), lit!(2)), input!());
            let input = Value::Num(n.0);
            evaluate(&term, &input) == evaluate(&term, &input)
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        let input = Value::Num(i32::MAX);
        let term = binary!(Add, input!(), lit!(1));
        assert_eq!(evaluate(&term, &input), Err(EvalError::Overflow));

        let term = binary!(Div, lit!(i32::MIN), lit!(-1));
        assert_eq!(evaluate(&term, &input), Err(EvalError::Overflow));
    }

    #[rstest]
    #[case("hello", 1, "h")]
    #[case("hello", 5, "hello")]
    #[case("hello", 9, "hello")]
    #[case("hello", 0, "")]
    #[case("hello", -1, "hell")]
    #[case("hello", -9, "")]
    #[case("héllo", 2, "hé")]
    fn test_slice_prefix(#[case] s: &str, #[case] n: i32, #[case] expected: &str) {
        assert_eq!(slice_prefix(s, n), expected);
    }

    #[rstest]
    #[case("hello", 1, "o")]
    #[case("hello", 5, "hello")]
    #[case("hello", 9, "hello")]
    #[case("hello", 0, "hello")]
    #[case("hello", -2, "llo")]
    #[case("hello", -9, "")]
    fn test_slice_suffix(#[case] s: &str, #[case] n: i32, #[case] expected: &str) {
        assert_eq!(slice_suffix(s, n), expected);
    }

    #[rstest]
    #[case(unary!(Upper, input!()), "hey", "HEY")]
    #[case(unary!(Lower, input!()), "HeY", "hey")]
    #[case(unary!(Trim, input!()), "  hey  ", "hey")]
    #[case(unary!(Trim, input!()), " ", "")]
    fn test_unary_string_ops(#[case] term: Term, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(evaluate(&term, &input.into()), Ok(expected.into()));
    }

    #[test]
    fn test_paired_input_components() {
        let input = Value::from(("hello", "you"));
        assert_eq!(evaluate(&input_x!(), &input), Ok("hello".into()));
        assert_eq!(evaluate(&input_y!(), &input), Ok("you".into()));
        assert_eq!(evaluate(&input!(), &input), Ok(input.clone()));

        // scalar inputs have no components
        assert!(evaluate(&input_x!(), &Value::from("hello")).is_err());
    }

    #[rstest]
    #[case(binary!(Concat, input!(), lit!(1)))]
    #[case(binary!(Left, lit!(2), input!()))]
    #[case(binary!(Add, input!(), lit!(" ")))]
    #[case(unary!(Upper, lit!(3)))]
    fn test_invalid_operands(#[case] term: Term) {
        let result = evaluate(&term, &Value::from("hello"));
        assert!(matches!(result, Err(EvalError::InvalidOperands(_))));
    }

    #[test]
    fn test_error_propagates_to_ancestors() {
        let term = binary!(Add, lit!(1), binary!(Div, input!(), lit!(0)));
        assert_eq!(
            evaluate(&term, &Value::Num(3)),
            Err(EvalError::DivisionByZero)
        );
    }
}
