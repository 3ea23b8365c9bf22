
//! Exact evaluation of closed expressions.

use super::Expr;
use super::atom::Atom;
use super::number::Number;
use super::function::EvaluationError;
use super::function::table::FunctionTable;

/// Evaluates an expression with no free variables down to a single
/// [`Number`]. The result stays exact for as long as every function
/// along the way has an exact answer, so `sin(0) + 1/6` evaluates to
/// the rational `1/6` rather than a float.
pub fn evaluate_exact(expr: &Expr, function_table: &FunctionTable) -> Result<Number, EvaluationError> {
  match expr {
    Expr::Atom(Atom::Number(n)) => Ok(n.clone()),
    Expr::Atom(Atom::Var(v)) => Err(EvaluationError::UnboundVariable(v.clone())),
    Expr::Call(function_name, args) => {
      let Some(function) = function_table.get(function_name) else {
        return Err(EvaluationError::UnknownFunction(function_name.clone()));
      };
      let args = args.iter()
        .map(|arg| evaluate_exact(arg, function_table))
        .collect::<Result<Vec<_>, _>>()?;
      function.evaluate_exact(args)
    }
  }
}
