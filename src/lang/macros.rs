#[macro_export]
macro_rules! lit {
    ($value:expr) => {
        $crate::lang::Term::Lit($crate::lang::Value::from($value))
    };
}

#[macro_export]
macro_rules! input {
    () => {
        $crate::lang::Term::Source($crate::lang::SourceKinds::Input)
    };
}

#[macro_export]
macro_rules! input_x {
    () => {
        $crate::lang::Term::Source($crate::lang::SourceKinds::InputX)
    };
}

#[macro_export]
macro_rules! input_y {
    () => {
        $crate::lang::Term::Source($crate::lang::SourceKinds::InputY)
    };
}

#[macro_export]
macro_rules! unary {
    ($op:ident, $child:expr) => {
        $crate::lang::Term::Unary(
            $crate::lang::UnaryOpKinds::$op,
            std::rc::Rc::new($child),
        )
    };
}

#[macro_export]
macro_rules! binary {
    ($op:ident, $left:expr, $right:expr) => {
        $crate::lang::Term::Binary(
            $crate::lang::BinOpKinds::$op,
            std::rc::Rc::new($left),
            std::rc::Rc::new($right),
        )
    };
}

pub use binary;
pub use input;
pub use input_x;
pub use input_y;
pub use lit;
pub use unary;
