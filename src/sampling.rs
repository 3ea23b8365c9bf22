
//! Sample grids and numeric comparison of approximations against the
//! function they approximate. This is the data a plotting front end
//! needs; nothing here draws.

use itertools::Itertools;
use serde::Serialize;

use std::fmt::{self, Display, Formatter};

/// A numeric function of one real variable.
pub trait Approximant {
  fn evaluate_at(&self, x: f64) -> f64;

  /// Evaluates at every sample, preserving order and length.
  fn evaluate(&self, xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| self.evaluate_at(x)).collect()
  }
}

/// Input accepted by the engines' evaluators: a single `f64` or a
/// one-dimensional collection of them. The output has the same shape
/// as the input.
pub trait Sampled {
  type Output;

  fn map_samples<F: Fn(f64) -> f64>(self, f: F) -> Self::Output;
}

impl Sampled for f64 {
  type Output = f64;

  fn map_samples<F: Fn(f64) -> f64>(self, f: F) -> f64 {
    f(self)
  }
}

impl Sampled for &[f64] {
  type Output = Vec<f64>;

  fn map_samples<F: Fn(f64) -> f64>(self, f: F) -> Vec<f64> {
    self.iter().map(|&x| f(x)).collect()
  }
}

impl Sampled for &Vec<f64> {
  type Output = Vec<f64>;

  fn map_samples<F: Fn(f64) -> f64>(self, f: F) -> Vec<f64> {
    self.as_slice().map_samples(f)
  }
}

impl<const N: usize> Sampled for [f64; N] {
  type Output = [f64; N];

  fn map_samples<F: Fn(f64) -> f64>(self, f: F) -> [f64; N] {
    self.map(f)
  }
}

/// `count` evenly spaced samples over `[start, end]`, both ends
/// included. A single sample lands on `start`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
  match count {
    0 => Vec::new(),
    1 => vec![start],
    _ => {
      let step = (end - start) / (count - 1) as f64;
      (0..count)
        .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
        .collect()
    }
  }
}

/// Evaluates a reference function and a set of labelled
/// approximations over a common grid.
pub struct Comparison<'a> {
  grid: Vec<f64>,
  reference: &'a dyn Approximant,
  approximants: Vec<(String, &'a dyn Approximant)>,
}

/// Summary of a [`Comparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
  pub samples: usize,
  pub start: f64,
  pub end: f64,
  pub deviations: Vec<Deviation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deviation {
  pub label: String,
  /// Largest `|approximation - reference|` over the finite samples.
  pub max_abs_error: f64,
  /// Position of the largest deviation.
  pub worst_x: f64,
  /// Samples where either value was NaN or infinite, e.g. near a
  /// pole of a rational approximation.
  pub non_finite: usize,
}

impl<'a> Comparison<'a> {
  pub fn new(grid: Vec<f64>, reference: &'a dyn Approximant) -> Self {
    Self { grid, reference, approximants: Vec::new() }
  }

  pub fn with(mut self, label: impl Into<String>, approximant: &'a dyn Approximant) -> Self {
    self.approximants.push((label.into(), approximant));
    self
  }

  pub fn grid(&self) -> &[f64] {
    &self.grid
  }

  /// Values of the reference function, then of each approximation in
  /// the order they were added.
  pub fn series(&self) -> Vec<(String, Vec<f64>)> {
    let mut all = Vec::with_capacity(self.approximants.len() + 1);
    all.push((String::from("reference"), self.reference.evaluate(&self.grid)));
    for (label, approximant) in &self.approximants {
      all.push((label.clone(), approximant.evaluate(&self.grid)));
    }
    all
  }

  pub fn report(&self) -> ComparisonReport {
    let reference = self.reference.evaluate(&self.grid);
    let deviations = self.approximants.iter()
      .map(|(label, approximant)| {
        let values = approximant.evaluate(&self.grid);
        let mut deviation = Deviation { label: label.clone(), max_abs_error: 0.0, worst_x: f64::NAN, non_finite: 0 };
        for ((&x, &expected), &actual) in self.grid.iter().zip(&reference).zip(&values) {
          let error = (actual - expected).abs();
          if !error.is_finite() {
            deviation.non_finite += 1;
          } else if deviation.worst_x.is_nan() || error > deviation.max_abs_error {
            deviation.max_abs_error = error;
            deviation.worst_x = x;
          }
        }
        deviation
      })
      .collect();
    ComparisonReport {
      samples: self.grid.len(),
      start: self.grid.first().copied().unwrap_or(f64::NAN),
      end: self.grid.last().copied().unwrap_or(f64::NAN),
      deviations,
    }
  }
}

impl Display for ComparisonReport {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "{} samples over [{}, {}]", self.samples, self.start, self.end)?;
    let lines = self.deviations.iter().map(|d| {
      if d.non_finite > 0 {
        format!("  {}: max |error| = {:e} at x = {} ({} non-finite samples)", d.label, d.max_abs_error, d.worst_x, d.non_finite)
      } else {
        format!("  {}: max |error| = {:e} at x = {}", d.label, d.max_abs_error, d.worst_x)
      }
    });
    write!(f, "{}", lines.format("\n"))
  }
}
