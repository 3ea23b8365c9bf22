
use super::Function;

use std::collections::HashMap;

/// A table of known functions, keyed by name.
#[derive(Debug, Default)]
pub struct FunctionTable {
  known_functions: HashMap<String, Function>,
}

impl FunctionTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, func: Function) {
    self.known_functions.insert(func.name().to_string(), func);
  }

  pub fn get(&self, name: &str) -> Option<&Function> {
    self.known_functions.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.known_functions.contains_key(name)
  }

  /// Names of all known functions, in no particular order.
  pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
    self.known_functions.keys().map(String::as_str)
  }
}
