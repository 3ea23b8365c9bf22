
//! Various utility functions.

pub mod matrix;
pub mod stricteq;

use std::convert::Infallible;
use std::cmp::Ordering;

pub trait Recip {
  type Output;

  fn recip(self) -> Self::Output;
}

impl Recip for f64 {
  type Output = f64;

  fn recip(self) -> Self::Output {
    f64::recip(self)
  }
}

pub fn unwrap_infallible<T>(res: Result<T, Infallible>) -> T {
  match res {
    Ok(res) => res,
    Err(_) => unreachable!(),
  }
}

/// Mutably borrows two elements from a mutable slice at the same
/// time. Panics if the two indices are the same, or if either index
/// is out of bounds.
pub fn double_borrow_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
  match i.cmp(&j) {
    Ordering::Equal => {
      panic!("Cannot mutably borrow index {i} twice at the same time");
    }
    Ordering::Greater => {
      let (b, a) = double_borrow_mut(slice, j, i);
      (a, b)
    }
    Ordering::Less => {
      let (left, right) = slice.split_at_mut(j);
      (&mut left[i], &mut right[0])
    }
  }
}
