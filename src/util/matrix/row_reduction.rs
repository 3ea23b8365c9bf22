
use super::Matrix;
use super::base::MatrixElement;
use crate::util::{Recip, double_borrow_mut};

use thiserror::Error;

/// A mutable reference to a [`Matrix`], on which elementary row
/// operations can be applied.
pub struct ReducibleMatrix<'a, T> {
  matrix: &'a mut Matrix<T>,
  /// Product of the factors by which the applied row operations have
  /// scaled the determinant.
  determinant_multiplier: T,
}

/// The result of solving a square system `A v = b` by full row
/// reduction of the augmented matrix `[A | b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolution {
  pub values: Vec<f64>,
  /// Determinant of `A`, recovered from the row operations applied.
  pub determinant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Matrix is singular (no usable pivot in column {column})")]
pub struct SingularMatrixError {
  pub column: usize,
}

impl<'a, T: MatrixElement> ReducibleMatrix<'a, T> {
  pub fn new(matrix: &'a mut Matrix<T>) -> Self {
    Self {
      matrix,
      determinant_multiplier: T::one(),
    }
  }

  pub fn height(&self) -> usize {
    self.matrix.height()
  }

  pub fn width(&self) -> usize {
    self.matrix.width()
  }

  /// Swaps two rows of the matrix. Panics on out of bounds.
  pub fn swap_rows(&mut self, a: usize, b: usize) {
    if a == b {
      return; // No-op
    }
    self.matrix.body.swap(a, b);
    self.determinant_multiplier = - T::one() * &self.determinant_multiplier;
  }

  /// Multiplies a row of the matrix by a nonzero scalar. It is the
  /// caller's responsibility to ensure that the scalar is nonzero.
  pub fn multiply(&mut self, row_index: usize, multiplier: T) {
    for elem in &mut self.matrix.body[row_index] {
      *elem = elem.clone() * &multiplier;
    }
    self.determinant_multiplier = multiplier * &self.determinant_multiplier;
  }

  /// Adds a scalar multiple of a row to another row.
  ///
  /// Panics if the two row indices are equal.
  pub fn add_to_row(&mut self, row_index: usize, multiplier: T, addend_index: usize) {
    assert!(row_index != addend_index, "add_to_row cannot add a row to itself");
    let (row, addend_row) = double_borrow_mut(&mut self.matrix.body, row_index, addend_index);

    for (elem, addend) in row.iter_mut().zip(addend_row.iter()) {
      *elem = multiplier.clone() * addend + &*elem;
    }
  }
}

impl ReducibleMatrix<'_, f64> {
  /// Treats the matrix as an augmented `n x (n + 1)` system `[A | b]`
  /// and reduces it to `[I | v]` with partial pivoting, returning
  /// `v`.
  ///
  /// A pivot whose magnitude is at most `tolerance` times the largest
  /// entry of `A` counts as zero, and the system is reported as
  /// singular. An empty (`0 x 1` or `0 x 0`) system has the empty
  /// solution and determinant 1.
  ///
  /// Panics if the matrix is nonempty and not of shape `n x (n + 1)`.
  pub fn solve_augmented(mut self, tolerance: f64) -> Result<LinearSolution, SingularMatrixError> {
    let n = self.height();
    if n == 0 {
      return Ok(LinearSolution { values: Vec::new(), determinant: 1.0 });
    }
    assert_eq!(self.width(), n + 1, "solve_augmented expects an n x (n + 1) matrix");

    let scale = self.matrix.body.iter()
      .flat_map(|row| row[..n].iter())
      .fold(0.0f64, |acc, x| acc.max(x.abs()));
    let threshold = tolerance * scale;

    for column in 0..n {
      let (pivot_row, pivot) = (column..n)
        .map(|row| (row, self.matrix.body[row][column]))
        .fold((column, 0.0f64), |best, candidate| {
          if candidate.1.abs() > best.1.abs() { candidate } else { best }
        });
      if scale == 0.0 || pivot.abs() <= threshold || !pivot.is_finite() {
        return Err(SingularMatrixError { column });
      }
      self.swap_rows(column, pivot_row);
      self.multiply(column, Recip::recip(pivot));
      for row in 0..n {
        if row != column {
          let factor = - self.matrix.body[row][column];
          if factor != 0.0 {
            self.add_to_row(row, factor, column);
          }
        }
      }
    }

    let values = self.matrix.body.iter().map(|row| row[n]).collect();
    let determinant = Recip::recip(self.determinant_multiplier);
    Ok(LinearSolution { values, determinant })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_abs_diff_eq;

  fn sample_matrix() -> Matrix<i32> {
    Matrix::new(vec![
      vec![1, 2, 3],
      vec![4, 5, 6],
      vec![7, 8, 9],
    ]).unwrap()
  }

  #[test]
  fn test_swap_rows() {
    let mut matrix = sample_matrix();
    let mut red_matrix = ReducibleMatrix::new(&mut matrix);
    red_matrix.swap_rows(0, 1);
    assert_eq!(red_matrix.matrix.body, vec![
      vec![4, 5, 6],
      vec![1, 2, 3],
      vec![7, 8, 9],
    ]);
    assert_eq!(red_matrix.determinant_multiplier, -1);
  }

  #[test]
  fn test_swap_rows_noop() {
    let mut matrix = sample_matrix();
    let mut red_matrix = ReducibleMatrix::new(&mut matrix);
    red_matrix.swap_rows(0, 0);
    assert_eq!(*red_matrix.matrix, sample_matrix());
    assert_eq!(red_matrix.determinant_multiplier, 1);
  }

  #[test]
  fn test_multiply_by_scalar() {
    let mut matrix = sample_matrix();
    let mut red_matrix = ReducibleMatrix::new(&mut matrix);
    red_matrix.multiply(0, 2);
    assert_eq!(red_matrix.matrix.body, vec![
      vec![2, 4, 6],
      vec![4, 5, 6],
      vec![7, 8, 9],
    ]);
    assert_eq!(red_matrix.determinant_multiplier, 2);
  }

  #[test]
  fn test_add_row() {
    let mut matrix = sample_matrix();
    let mut red_matrix = ReducibleMatrix::new(&mut matrix);
    red_matrix.add_to_row(0, -3, 1);
    assert_eq!(red_matrix.matrix.body, vec![
      vec![-11, -13, -15],
      vec![4, 5, 6],
      vec![7, 8, 9],
    ]);
    assert_eq!(red_matrix.determinant_multiplier, 1);
  }

  #[test]
  fn test_solve_two_by_two() {
    // 2a + b = 5, a - b = 1
    let mut matrix = Matrix::new(vec![
      vec![2.0, 1.0, 5.0],
      vec![1.0, -1.0, 1.0],
    ]).unwrap();
    let solution = ReducibleMatrix::new(&mut matrix).solve_augmented(1e-12).unwrap();
    assert_abs_diff_eq!(solution.values[0], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(solution.values[1], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(solution.determinant, -3.0, epsilon = 1e-12);
  }

  #[test]
  fn test_solve_needs_pivoting() {
    let mut matrix = Matrix::new(vec![
      vec![0.0, 1.0, 3.0],
      vec![1.0, 0.0, 7.0],
    ]).unwrap();
    let solution = ReducibleMatrix::new(&mut matrix).solve_augmented(1e-12).unwrap();
    assert_abs_diff_eq!(solution.values[0], 7.0, epsilon = 1e-12);
    assert_abs_diff_eq!(solution.values[1], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(solution.determinant, -1.0, epsilon = 1e-12);
  }

  #[test]
  fn test_solve_singular() {
    let mut matrix = Matrix::new(vec![
      vec![1.0, 2.0, 3.0],
      vec![2.0, 4.0, 6.0],
    ]).unwrap();
    let err = ReducibleMatrix::new(&mut matrix).solve_augmented(1e-12).unwrap_err();
    assert_eq!(err, SingularMatrixError { column: 1 });
  }

  #[test]
  fn test_solve_zero_matrix() {
    let mut matrix = Matrix::new(vec![
      vec![0.0, 0.0],
    ]).unwrap();
    let err = ReducibleMatrix::new(&mut matrix).solve_augmented(1e-12).unwrap_err();
    assert_eq!(err, SingularMatrixError { column: 0 });
  }

  #[test]
  fn test_solve_empty_system() {
    let mut matrix: Matrix<f64> = Matrix::new(vec![]).unwrap();
    let solution = ReducibleMatrix::new(&mut matrix).solve_augmented(1e-12).unwrap();
    assert!(solution.values.is_empty());
    assert_eq!(solution.determinant, 1.0);
  }
}
