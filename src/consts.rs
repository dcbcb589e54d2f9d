/// Literal terminals seeded into the numeric candidate pool.
pub const NUMERIC_LITERALS: &[i32] = &[-1, 0, 1, 2];

/// String literal terminals seeded into the textual candidate pool.
pub const TEXT_LITERALS: &[&str] = &[" "];

/// Length literals for the textual grammar's slicing operators.
pub const TEXT_QUANTITIES: &[i32] = &[1, 2, 3];

pub const DEFAULT_MAX_ROUNDS: usize = 3;
pub const DEFAULT_MAX_POOL: usize = 500_000;
