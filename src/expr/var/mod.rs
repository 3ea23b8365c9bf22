
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// A variable in an equation, left intentionally un-evaluated.
///
/// Variables are identified by strings. A variable's name must begin
/// with a letter, followed by zero or more letters, digits, or
/// apostrophes. This structure enforces these constraints.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Var(String);

#[derive(Clone, Debug, Error)]
#[error("Invalid variable name '{original_string}'")]
pub struct TryFromStringError {
  original_string: String,
}

/// The name of the free variable each engine creates for itself.
pub const DEFAULT_VARIABLE_NAME: &str = "x";

pub static VALID_NAME_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[a-zA-Z][a-zA-Z0-9']*$").unwrap()
});

impl Var {
  pub fn new(name: impl Into<String>) -> Option<Self> {
    Self::try_from(name.into()).ok()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// The default variable is `x`.
impl Default for Var {
  fn default() -> Self {
    Self(DEFAULT_VARIABLE_NAME.to_owned())
  }
}

impl TryFrom<String> for Var {
  type Error = TryFromStringError;

  fn try_from(name: String) -> Result<Self, Self::Error> {
    if VALID_NAME_RE.is_match(&name) {
      Ok(Self(name))
    } else {
      Err(TryFromStringError { original_string: name })
    }
  }
}

impl From<Var> for String {
  fn from(v: Var) -> Self {
    v.0
  }
}

impl Display for Var {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", &self.0)
  }
}
