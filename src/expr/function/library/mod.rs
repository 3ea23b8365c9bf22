
//! Library of built-in well-known mathematical functions and their
//! properties.

use crate::expr::function::table::FunctionTable;

use once_cell::sync::Lazy;

mod arithmetic;
mod transcendental;

pub fn build_function_table() -> FunctionTable {
  let mut table = FunctionTable::new();
  arithmetic::append_arithmetic_functions(&mut table);
  transcendental::append_transcendental_functions(&mut table);
  table
}

/// The shared table of built-in functions. It is immutable, so every
/// engine can read it without coordinating access.
pub fn builtin_functions() -> &'static FunctionTable {
  static TABLE: Lazy<FunctionTable> = Lazy::new(build_function_table);
  &TABLE
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_names() {
    let table = builtin_functions();
    for name in ["+", "-", "*", "/", "^", "negate", "sin", "cos", "tan", "exp", "ln", "sqrt"] {
      assert!(table.contains(name), "missing builtin {name}");
    }
    assert_eq!(table.names().count(), 12);
  }
}
