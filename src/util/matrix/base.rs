
use num::One;

use std::ops::{Add, Mul, Neg};

/// Trait defining elements that are arithmetic enough to be used in
/// elementary row operations.
///
/// A blanket impl takes care of any satisfactory type, so this never
/// needs to be implemented by hand.
pub trait MatrixElement: Clone + One + for<'a> Add<&'a Self, Output=Self> + for<'a> Mul<&'a Self, Output=Self> + Neg<Output=Self> {}

impl<T> MatrixElement for T where T: Clone + One + for<'a> Add<&'a Self, Output=Self> + for<'a> Mul<&'a Self, Output=Self> + Neg<Output=Self> {}

