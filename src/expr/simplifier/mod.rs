
//! Light algebraic cleanup of expression trees.

mod arithmetic;
mod base;

pub use arithmetic::ArithmeticSimplifier;
pub use base::Simplifier;
