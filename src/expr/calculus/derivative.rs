
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::var::Var;
use crate::expr::function::builder::ArityError;
use crate::expr::function::table::FunctionTable;
use crate::expr::simplifier::Simplifier;
use crate::expr::walker;

use log::trace;
use thiserror::Error;

#[derive(Debug)]
pub struct DerivativeEngine<'a> {
  target_variable: Var,
  original_expr: Expr,
  function_table: &'a FunctionTable,
}

#[derive(Debug, Clone, Error)]
#[error("Cannot differentiate {original_expr}: {error}")]
pub struct DifferentiationFailure {
  pub original_expr: Expr,
  pub error: DifferentiationError,
  _priv: (), // Prevent construction outside of this module
}

#[derive(Debug, Clone, Error)]
pub enum DifferentiationError {
  #[error("Derivative of function '{0}' is not known")]
  UnknownDerivative(String),
  #[error("Function '{0}': {1}")]
  ArityError(String, ArityError),
}

impl<'a> DerivativeEngine<'a> {
  /// True if `expr` does not depend on the variable being
  /// differentiated against.
  pub fn is_constant(&self, expr: &Expr) -> bool {
    !expr.contains_var(&self.target_variable)
  }

  pub fn differentiate(&self, expr: Expr) -> Result<Expr, DifferentiationFailure> {
    match expr {
      Expr::Call(function, args) => {
        let Some(known_function) = self.function_table.get(&function) else {
          return Err(self.error(DifferentiationError::UnknownDerivative(function)));
        };
        known_function.differentiate(args, self)
      }
      Expr::Atom(Atom::Number(_)) => {
        Ok(Expr::zero())
      }
      Expr::Atom(Atom::Var(var)) => {
        if var == self.target_variable {
          Ok(Expr::one())
        } else {
          Ok(Expr::zero())
        }
      }
    }
  }

  pub fn error(&self, reason: DifferentiationError) -> DifferentiationFailure {
    DifferentiationFailure {
      original_expr: self.original_expr.clone(),
      error: reason,
      _priv: (),
    }
  }
}

pub fn differentiate(function_table: &FunctionTable, expr: Expr, var: Var) -> Result<Expr, DifferentiationFailure> {
  let engine = DerivativeEngine {
    target_variable: var,
    original_expr: expr.clone(),
    function_table,
  };
  engine.differentiate(expr)
}

/// Returns `[f, f', f'', ..., f^(n)]`, each simplified before it is
/// differentiated again so that the trees stay small.
pub fn nth_derivatives(
  function_table: &FunctionTable,
  simplifier: &dyn Simplifier,
  expr: Expr,
  var: &Var,
  n: usize,
) -> Result<Vec<Expr>, DifferentiationFailure> {
  let mut derivatives = Vec::with_capacity(n + 1);
  let mut current = simplifier.simplify_expr(expr);
  for order in 1..=n {
    let next = simplifier.simplify_expr(differentiate(function_table, current.clone(), var.clone())?);
    trace!("derivative of order {order} has {} nodes", walker::node_count(&next));
    derivatives.push(current);
    current = next;
  }
  derivatives.push(current);
  Ok(derivatives)
}

/// The `n`-th derivative of `expr` with respect to `var`, simplified.
pub fn nth_derivative(
  function_table: &FunctionTable,
  simplifier: &dyn Simplifier,
  expr: Expr,
  var: &Var,
  n: usize,
) -> Result<Expr, DifferentiationFailure> {
  let mut current = simplifier.simplify_expr(expr);
  for _ in 0..n {
    current = simplifier.simplify_expr(differentiate(function_table, current, var.clone())?);
  }
  Ok(current)
}
