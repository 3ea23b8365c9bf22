
pub mod atom;
pub mod calculus;
pub mod evaluator;
pub mod function;
pub mod lambda;
pub mod number;
pub mod simplifier;
pub mod var;
pub mod walker;

use atom::Atom;
use number::{Number, NumberRepr};
use var::Var;
use crate::util::stricteq::StrictEq;

use itertools::Itertools;
use num::{Zero, One};

use std::fmt::{self, Display, Formatter};

/// A symbolic expression: either an atom or a named function applied
/// to arguments. Arithmetic is expressed through the calls `+`, `-`,
/// `*`, `/`, `^`, and `negate`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Atom(Atom),
  Call(String, Vec<Expr>),
}

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_NEGATE: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {

  /// Convenience constructor for [Expr::Call].
  pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(name.to_string(), args)
  }

  /// Convenience constructor for a variable atom. Returns `None` if
  /// the name is not a valid variable name.
  pub fn var(name: &str) -> Option<Expr> {
    Var::new(name).map(|v| Expr::Atom(Atom::Var(v)))
  }

  pub fn zero() -> Expr {
    Expr::from(Number::zero())
  }

  pub fn one() -> Expr {
    Expr::from(Number::one())
  }

  pub fn as_number(&self) -> Option<&Number> {
    match self {
      Expr::Atom(Atom::Number(n)) => Some(n),
      _ => None,
    }
  }

  pub fn is_zero(&self) -> bool {
    self.as_number().is_some_and(|n| n.is_zero())
  }

  pub fn is_one(&self) -> bool {
    self.as_number().is_some_and(|n| n.is_one())
  }

  /// True if the variable occurs anywhere in the expression.
  pub fn contains_var(&self, var: &Var) -> bool {
    walker::any(self, |e| matches!(e, Expr::Atom(Atom::Var(v)) if v == var))
  }

  /// Replaces every occurrence of `var` with `value`.
  pub fn substitute(self, var: &Var, value: &Expr) -> Expr {
    walker::postorder_walk_ok(self, |e| {
      match e {
        Expr::Atom(Atom::Var(v)) if &v == var => value.clone(),
        e => e,
      }
    })
  }

  /// If this expression is syntactically a negation, returns the
  /// negated operand. Used for printing `a - b` rather than
  /// `a + -b`.
  fn negated_form(&self) -> Option<Expr> {
    match self {
      Expr::Atom(Atom::Number(n)) if n.is_negative() => Some(Expr::from(-n)),
      Expr::Call(name, args) if name == "negate" && args.len() == 1 => Some(args[0].clone()),
      Expr::Call(name, args) if name == "*" && args.len() >= 2 => {
        let leading = args[0].as_number().filter(|n| n.is_negative())?;
        let leading = - leading;
        let mut rest = args[1..].to_vec();
        if !leading.is_one() {
          rest.insert(0, Expr::from(leading));
        }
        if rest.len() == 1 {
          rest.pop()
        } else {
          Some(Expr::call("*", rest))
        }
      }
      _ => None,
    }
  }

  fn precedence(&self) -> u8 {
    match self {
      Expr::Atom(Atom::Number(n)) => {
        if n.is_negative() {
          PREC_NEGATE
        } else if n.repr() == NumberRepr::Ratio {
          PREC_PRODUCT
        } else {
          PREC_ATOM
        }
      }
      Expr::Atom(Atom::Var(_)) => PREC_ATOM,
      Expr::Call(name, args) => {
        match (name.as_str(), args.len()) {
          ("+", n) if n > 0 => PREC_SUM,
          ("-", 2) => PREC_SUM,
          ("*", n) if n > 0 => PREC_PRODUCT,
          ("/", 2) => PREC_PRODUCT,
          ("negate", 1) => PREC_NEGATE,
          ("^", 2) => PREC_POWER,
          _ => PREC_ATOM,
        }
      }
    }
  }

  fn fmt_at(&self, f: &mut Formatter<'_>, min_prec: u8) -> fmt::Result {
    if self.precedence() < min_prec {
      write!(f, "(")?;
      self.fmt_bare(f)?;
      write!(f, ")")
    } else {
      self.fmt_bare(f)
    }
  }

  fn fmt_bare(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let (name, args) = match self {
      Expr::Atom(atom) => return write!(f, "{atom}"),
      Expr::Call(name, args) => (name, args),
    };
    match (name.as_str(), args.as_slice()) {
      ("+", [first, rest @ ..]) => {
        first.fmt_at(f, PREC_SUM)?;
        for term in rest {
          match term.negated_form() {
            Some(positive) => {
              write!(f, " - ")?;
              positive.fmt_at(f, PREC_PRODUCT)?;
            }
            None => {
              write!(f, " + ")?;
              term.fmt_at(f, PREC_PRODUCT)?;
            }
          }
        }
        Ok(())
      }
      ("-", [left, right]) => {
        left.fmt_at(f, PREC_SUM)?;
        write!(f, " - ")?;
        right.fmt_at(f, PREC_PRODUCT)
      }
      ("*", [first, rest @ ..]) => {
        first.fmt_at(f, PREC_PRODUCT)?;
        for factor in rest {
          write!(f, "*")?;
          factor.fmt_at(f, PREC_POWER)?;
        }
        Ok(())
      }
      ("/", [left, right]) => {
        left.fmt_at(f, PREC_PRODUCT)?;
        write!(f, "/")?;
        right.fmt_at(f, PREC_POWER)
      }
      ("negate", [arg]) => {
        write!(f, "-")?;
        arg.fmt_at(f, PREC_PRODUCT)
      }
      ("^", [base, exponent]) => {
        base.fmt_at(f, PREC_ATOM)?;
        write!(f, "^")?;
        exponent.fmt_at(f, PREC_ATOM)
      }
      (name, args) => {
        write!(f, "{}({})", name, args.iter().join(", "))
      }
    }
  }

}

impl From<Atom> for Expr {
  fn from(a: Atom) -> Expr {
    Expr::Atom(a)
  }
}

impl From<Number> for Expr {
  fn from(n: Number) -> Expr {
    Expr::Atom(Atom::Number(n))
  }
}

impl From<Var> for Expr {
  fn from(v: Var) -> Expr {
    Expr::Atom(Atom::Var(v))
  }
}

impl From<i64> for Expr {
  fn from(n: i64) -> Expr {
    Expr::Atom(Atom::from(n))
  }
}

impl From<f64> for Expr {
  fn from(n: f64) -> Expr {
    Expr::Atom(Atom::from(n))
  }
}

impl StrictEq for Expr {
  fn strict_eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Expr::Atom(a), Expr::Atom(b)) => a.strict_eq(b),
      (Expr::Call(f, a), Expr::Call(g, b)) => f == g && a.strict_eq(b),
      _ => false,
    }
  }
}

impl Display for Expr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.fmt_bare(f)
  }
}
