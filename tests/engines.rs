
use approximant::{Approximant, Error, PadeEngine, TaylorEngine};
use approximant::expr::Expr;
use approximant::expr::function::library::builtin_functions;
use approximant::expr::lambda::Lambda;
use approximant::expr::number::Number;
use approximant::sampling::{linspace, Comparison};

use approx::assert_abs_diff_eq;

use std::f64::consts::PI;

fn sin(x: Expr) -> Expr {
  Expr::call("sin", vec![x])
}

fn monomial(k: i64) -> impl FnOnce(Expr) -> Expr {
  move |x| Expr::call("^", vec![x, Expr::from(k)])
}

fn binomial(n: u64, k: u64) -> i64 {
  ((n - k + 1)..=n).product::<u64>() as i64 / (1..=k).product::<u64>() as i64
}

#[test]
fn monomials_reproduce_themselves_at_zero() {
  for k in 0..=5 {
    let engine = TaylorEngine::new(monomial(k), 5, 0).unwrap();
    let coefficients = engine.compute_coefficients().unwrap().coefficients();
    for (n, c) in coefficients.iter().enumerate() {
      let expected = if n as i64 == k { Number::from(1) } else { Number::from(0) };
      assert!(c.is_exact());
      assert_eq!(*c, expected, "coefficient {n} of x^{k}");
    }
  }
}

#[test]
fn monomials_reproduce_themselves_at_other_points() {
  for k in 0..=4u64 {
    let engine = TaylorEngine::new(monomial(k as i64), 4, 2).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    for (n, c) in approximation.coefficients().iter().enumerate() {
      let n = n as u64;
      let expected = if n <= k { binomial(k, n) * 2i64.pow((k - n) as u32) } else { 0 };
      assert_eq!(*c, Number::from(expected), "coefficient {n} of x^{k} about 2");
    }
    for x in [-1.5, 0.0, 0.25, 3.0] {
      assert_abs_diff_eq!(approximation.evaluate_series(x), f64::powi(x, k as i32), epsilon = 1e-9);
    }
  }
}

#[test]
fn sine_to_degree_four() {
  let engine = TaylorEngine::new(sin, 4, 0).unwrap();
  engine.compute_coefficients().unwrap();
  let coefficients = engine.coefficients().unwrap();
  assert_eq!(
    coefficients.to_vec(),
    vec![Number::from(0), Number::from(1), Number::from(0), Number::ratio(-1, 6), Number::from(0)],
  );
  assert_eq!(engine.evaluate_series(0.0).unwrap(), 0.0);
  assert_abs_diff_eq!(engine.evaluate_series(0.1).unwrap(), 0.1f64.sin(), epsilon = 1e-6);
  assert_eq!(engine.describe().unwrap(), "Taylor series expansion at x=0: x - 1/6*x^3");
}

#[test]
fn repeated_evaluation_is_bit_identical() {
  let engine = TaylorEngine::new(sin, 7, 0).unwrap();
  engine.compute_coefficients().unwrap();
  let xs = linspace(-PI, PI, 57);
  let first = engine.evaluate_series(&xs).unwrap();
  let second = engine.evaluate_series(&xs).unwrap();
  let first_bits: Vec<u64> = first.iter().map(|v| v.to_bits()).collect();
  let second_bits: Vec<u64> = second.iter().map(|v| v.to_bits()).collect();
  assert_eq!(first_bits, second_bits);

  // Computing again hands back the same approximation.
  engine.compute_coefficients().unwrap();
  assert_eq!(engine.coefficients().unwrap().len(), 8);
  assert_eq!(engine.evaluate_series(&xs).unwrap(), first);
}

#[test]
fn pade_matches_the_sine_series() {
  let engine = PadeEngine::new(sin, 3, 2, 0).unwrap();
  let pade = engine.compute_coefficients().unwrap();
  let taylor = TaylorEngine::new(sin, 5, 0).unwrap();
  let expected = taylor.compute_coefficients().unwrap().coefficients_f64();
  let actual = pade.series_coefficients(5);
  assert_abs_diff_eq!(actual.as_slice(), expected.as_slice(), epsilon = 1e-12);

  assert_eq!(pade.numerator().degree(), 3);
  assert_eq!(pade.denominator().degree(), 2);
  assert_eq!(pade.denominator().coefficient(0), 1.0);
  assert_abs_diff_eq!(pade.numerator().coefficient(3), -7.0 / 60.0, epsilon = 1e-12);
  assert_abs_diff_eq!(pade.denominator().coefficient(2), 1.0 / 20.0, epsilon = 1e-12);
}

#[test]
fn pade_from_precomputed_taylor_agrees_with_engine() {
  let taylor_engine = TaylorEngine::new(|x| Expr::call("exp", vec![x]), 6, 0).unwrap();
  let taylor = taylor_engine.compute_coefficients().unwrap();
  let composed = PadeEngine::from_taylor(taylor, 2, 2).unwrap();
  let engine = PadeEngine::new(|x| Expr::call("exp", vec![x]), 2, 2, 0).unwrap();
  let direct = engine.compute_coefficients().unwrap();
  assert_eq!(composed.numerator(), direct.numerator());
  assert_eq!(composed.denominator(), direct.denominator());
  // The [2/2] approximant of exp is (12 + 6x + x^2) / (12 - 6x + x^2).
  assert_abs_diff_eq!(direct.numerator().coefficients(), [1.0, 0.5, 1.0 / 12.0].as_slice(), epsilon = 1e-12);
  assert_abs_diff_eq!(direct.denominator().coefficients(), [1.0, -0.5, 1.0 / 12.0].as_slice(), epsilon = 1e-12);
}

#[test]
fn trivial_pade_is_the_value_at_the_point() {
  let engine = PadeEngine::new(|x| Expr::call("cos", vec![x]), 0, 0, 1).unwrap();
  let pade = engine.compute_coefficients().unwrap();
  assert_abs_diff_eq!(pade.numerator().coefficients(), [1f64.cos()].as_slice(), epsilon = 1e-15);
  assert_eq!(pade.denominator().coefficients(), &[1.0]);
  assert_abs_diff_eq!(pade.evaluate_at(-3.0), 1f64.cos(), epsilon = 1e-15);
}

#[test]
fn degenerate_pade_system_is_reported() {
  // sin has no [2/1] approximant: the Toeplitz system is c_2 q_1 = -c_3
  // with c_2 = 0.
  let engine = PadeEngine::new(sin, 2, 1, 0).unwrap();
  let err = engine.compute_coefficients().unwrap_err();
  assert!(matches!(err, Error::SingularSystem { order_m: 2, order_n: 1 }));
  assert!(matches!(engine.evaluate(0.5), Err(Error::UninitializedState(_))));
}

#[test]
fn negative_parameters_are_rejected() {
  assert!(matches!(TaylorEngine::new(sin, -1, 0), Err(Error::InvalidParameter { .. })));
  assert!(matches!(PadeEngine::new(sin, -1, 0, 0), Err(Error::InvalidParameter { .. })));
  assert!(matches!(PadeEngine::new(sin, 0, -1, 0), Err(Error::InvalidParameter { .. })));
}

#[test]
fn evaluation_preserves_shape() {
  let xs = linspace(-PI, PI, 400);
  let taylor = TaylorEngine::new(sin, 4, 0).unwrap();
  taylor.compute_coefficients().unwrap();
  let values = taylor.evaluate_series(xs.as_slice()).unwrap();
  assert_eq!(values.len(), 400);
  assert!(values.iter().all(|v| !v.is_nan()));

  let pade = PadeEngine::new(sin, 3, 2, 0).unwrap();
  pade.compute_coefficients().unwrap();
  let values = pade.evaluate(&xs).unwrap();
  assert_eq!(values.len(), 400);
  assert!(values.iter().all(|v| v.is_finite()));

  let scalar: f64 = taylor.evaluate_series(0.5).unwrap();
  assert_abs_diff_eq!(scalar, 0.5 - 0.125 / 6.0, epsilon = 1e-15);
  let fixed: [f64; 3] = pade.evaluate([0.0, 0.1, 0.2]).unwrap();
  assert_eq!(fixed[0], 0.0);
}

#[test]
fn pade_beats_taylor_of_the_same_order_for_sine() {
  let taylor_engine = TaylorEngine::new(sin, 5, 0).unwrap();
  let taylor = taylor_engine.compute_coefficients().unwrap();
  let pade_engine = PadeEngine::new(sin, 3, 2, 0).unwrap();
  let pade = pade_engine.compute_coefficients().unwrap();
  let original = Lambda::compile(taylor.function(), taylor.variable(), builtin_functions()).unwrap();
  let report = Comparison::new(linspace(-PI, PI, 400), &original)
    .with("taylor", taylor)
    .with("pade", pade)
    .report();
  assert_eq!(report.samples, 400);
  let taylor_error = report.deviations[0].max_abs_error;
  let pade_error = report.deviations[1].max_abs_error;
  assert!(pade_error < taylor_error, "pade {pade_error} vs taylor {taylor_error}");
  assert!(pade_error < 0.5);
}

#[test]
fn functions_undefined_at_the_point_fail_symbolically() {
  let engine = TaylorEngine::new(|x| Expr::call("/", vec![Expr::one(), x]), 3, 0).unwrap();
  assert!(matches!(engine.compute_coefficients(), Err(Error::SymbolicEvaluation(_))));
  let engine = PadeEngine::new(|x| Expr::call("ln", vec![x]), 1, 1, 0).unwrap();
  assert!(matches!(engine.compute_coefficients(), Err(Error::SymbolicEvaluation(_))));
}

fn recip_one_minus(x: Expr) -> Expr {
  Expr::call("/", vec![Expr::one(), Expr::call("-", vec![Expr::one(), x])])
}

fn tan(x: Expr) -> Expr {
  Expr::call("tan", vec![x])
}

fn log_one_plus(x: Expr) -> Expr {
  Expr::call("ln", vec![Expr::call("+", vec![Expr::one(), x])])
}

#[test]
fn quotients_expand_to_high_degree() {
  let engine = TaylorEngine::new(recip_one_minus, 20, 0).unwrap();
  let coefficients = engine.compute_coefficients().unwrap().coefficients();
  assert_eq!(coefficients.len(), 21);
  assert!(coefficients.iter().all(|c| c.is_exact() && *c == Number::from(1)));

  let engine = TaylorEngine::new(tan, 13, 0).unwrap();
  let coefficients = engine.compute_coefficients().unwrap().coefficients();
  assert_eq!(coefficients[9], Number::ratio(62, 2835));
  assert_eq!(coefficients[11], Number::ratio(1382, 155925));
  assert_eq!(coefficients[13], Number::ratio(21844, 6081075));
  assert!(coefficients.iter().step_by(2).all(|c| *c == Number::from(0)));

  let engine = TaylorEngine::new(log_one_plus, 12, 0).unwrap();
  let coefficients = engine.compute_coefficients().unwrap().coefficients();
  for (n, c) in coefficients.iter().enumerate().skip(1) {
    let sign = if n % 2 == 1 { 1 } else { -1 };
    assert_eq!(*c, Number::ratio(sign, n as i64), "coefficient {n} of ln(1 + x)");
  }
}

#[test]
fn pade_of_tangent_at_order_eight() {
  let engine = PadeEngine::new(tan, 4, 4, 0).unwrap();
  let pade = engine.compute_coefficients().unwrap();
  let taylor = TaylorEngine::new(tan, 8, 0).unwrap();
  let expected = taylor.compute_coefficients().unwrap().coefficients_f64();
  assert_abs_diff_eq!(pade.series_coefficients(8).as_slice(), expected.as_slice(), epsilon = 1e-10);
  assert_abs_diff_eq!(pade.evaluate_at(1.0), 1f64.tan(), epsilon = 1e-4);
}
