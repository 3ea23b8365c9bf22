
use crate::expr::Expr;
use crate::expr::walker::postorder_walk_ok;

pub trait Simplifier {
  /// Simplifies a single node whose children have already been
  /// simplified.
  fn simplify_expr_part(&self, expr: Expr) -> Expr;

  fn simplify_expr(&self, expr: Expr) -> Expr {
    postorder_walk_ok(expr, |e| self.simplify_expr_part(e))
  }
}
