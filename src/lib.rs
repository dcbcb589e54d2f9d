//! Programming-by-example synthesis: given input/output example pairs,
//! search a fixed grammar of expression terms bottom-up for a program that
//! reproduces every pair exactly.

pub mod consts;
pub mod lang;
pub mod syn;
