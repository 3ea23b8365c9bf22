
//! Demo: expands a function as a Taylor polynomial and as a Pade
//! rational function, then compares both against the function itself
//! on a sample grid.

use approximant::{PadeEngine, TaylorEngine};
use approximant::taylor::CoefficientMethod;
use approximant::expr::Expr;
use approximant::expr::function::library::builtin_functions;
use approximant::expr::lambda::Lambda;
use approximant::expr::number::Number;
use approximant::poly::Polynomial;
use approximant::sampling::{self, Comparison, ComparisonReport};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{info, warn};
use serde::Serialize;

use std::f64::consts::PI;

/// Taylor and Pade approximations of an elementary function
#[derive(Parser)]
#[command(name = "approximant-demo", version)]
#[command(after_help = r#"
Environment Variables:
  APPROXIMANT_FUNCTION=sin     Function to approximate
  APPROXIMANT_DEGREE=4         Taylor degree
  APPROXIMANT_POINT=0          Expansion point (7, 1:2 and 0.5 are all accepted)
  APPROXIMANT_METHOD=series    Coefficient method (series, derivatives)
  APPROXIMANT_LOG_LEVEL=info   Log level (error, warn, info, debug, trace)
"#)]
struct Cli {
  /// Function to approximate
  #[arg(long, value_enum, env = "APPROXIMANT_FUNCTION", default_value = "sin")]
  function: FunctionChoice,

  /// Degree of the Taylor polynomial
  #[arg(long, env = "APPROXIMANT_DEGREE", default_value_t = 4, allow_negative_numbers = true)]
  degree: i64,

  /// Expansion point, as an integer, a ratio `p:q`, or a float
  #[arg(long, env = "APPROXIMANT_POINT", default_value = "0", allow_hyphen_values = true)]
  point: Number,

  /// Numerator order of the Pade approximation
  #[arg(long, env = "APPROXIMANT_ORDER_M", default_value_t = 3, allow_negative_numbers = true)]
  order_m: i64,

  /// Denominator order of the Pade approximation
  #[arg(long, env = "APPROXIMANT_ORDER_N", default_value_t = 2, allow_negative_numbers = true)]
  order_n: i64,

  /// Number of samples in the comparison grid
  #[arg(long, env = "APPROXIMANT_SAMPLES", default_value_t = 400)]
  samples: usize,

  /// Start of the comparison grid
  #[arg(long, env = "APPROXIMANT_FROM", default_value_t = -PI, allow_negative_numbers = true)]
  from: f64,

  /// End of the comparison grid
  #[arg(long, env = "APPROXIMANT_TO", default_value_t = PI, allow_negative_numbers = true)]
  to: f64,

  /// How the Taylor coefficients are found
  #[arg(long, value_enum, env = "APPROXIMANT_METHOD", default_value = "series")]
  method: MethodChoice,

  /// Print the results as JSON
  #[arg(long, env = "APPROXIMANT_JSON")]
  json: bool,

  /// Include the sampled curves in the JSON output
  #[arg(long, env = "APPROXIMANT_CURVES", requires = "json")]
  curves: bool,

  /// Set log level
  #[arg(long, value_enum, env = "APPROXIMANT_LOG_LEVEL", default_value = "info")]
  log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FunctionChoice {
  Sin,
  Cos,
  Exp,
  Tan,
  /// ln(1 + x)
  Log1p,
  /// 1 / (1 - x)
  Recip1m,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodChoice {
  /// Truncated power series arithmetic
  Series,
  /// Repeated symbolic differentiation (slow for quotients)
  Derivatives,
}

impl From<MethodChoice> for CoefficientMethod {
  fn from(choice: MethodChoice) -> Self {
    match choice {
      MethodChoice::Series => CoefficientMethod::Series,
      MethodChoice::Derivatives => CoefficientMethod::Derivatives,
    }
  }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl From<LogLevel> for log::LevelFilter {
  fn from(level: LogLevel) -> Self {
    match level {
      LogLevel::Error => log::LevelFilter::Error,
      LogLevel::Warn => log::LevelFilter::Warn,
      LogLevel::Info => log::LevelFilter::Info,
      LogLevel::Debug => log::LevelFilter::Debug,
      LogLevel::Trace => log::LevelFilter::Trace,
    }
  }
}

impl FunctionChoice {
  fn build(self, x: Expr) -> Expr {
    match self {
      FunctionChoice::Sin => Expr::call("sin", vec![x]),
      FunctionChoice::Cos => Expr::call("cos", vec![x]),
      FunctionChoice::Exp => Expr::call("exp", vec![x]),
      FunctionChoice::Tan => Expr::call("tan", vec![x]),
      FunctionChoice::Log1p => Expr::call("ln", vec![Expr::call("+", vec![Expr::one(), x])]),
      FunctionChoice::Recip1m => Expr::call("/", vec![Expr::one(), Expr::call("-", vec![Expr::one(), x])]),
    }
  }
}

#[derive(Serialize)]
struct DemoOutput<'a> {
  function: String,
  taylor: TaylorOutput<'a>,
  pade: PadeOutput<'a>,
  comparison: ComparisonReport,
  #[serde(skip_serializing_if = "Option::is_none")]
  curves: Option<CurvesOutput<'a>>,
}

#[derive(Serialize)]
struct CurvesOutput<'a> {
  x: &'a [f64],
  values: Vec<(String, Vec<f64>)>,
}

#[derive(Serialize)]
struct TaylorOutput<'a> {
  degree: usize,
  point: &'a Number,
  coefficients: &'a [Number],
  series: String,
}

#[derive(Serialize)]
struct PadeOutput<'a> {
  order_m: usize,
  order_n: usize,
  numerator: &'a Polynomial,
  denominator: &'a Polynomial,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  env_logger::Builder::from_env(Env::default().default_filter_or("info"))
    .filter_level(cli.log_level.into())
    .init();

  let function = cli.function;
  let taylor_engine = TaylorEngine::new(|x| function.build(x), cli.degree, cli.point.clone())
    .context("Could not set up the Taylor expansion")?
    .with_method(cli.method.into());
  let taylor = taylor_engine.compute_coefficients()
    .with_context(|| format!("Could not expand {}", taylor_engine.function()))?;

  let pade_engine = PadeEngine::new(|x| function.build(x), cli.order_m, cli.order_n, cli.point.clone())
    .context("Could not set up the Pade approximation")?
    .with_method(cli.method.into());
  let pade = pade_engine.compute_coefficients()
    .with_context(|| format!("Could not find a Pade approximation of {}", pade_engine.function()))?;

  let original = Lambda::compile(taylor.function(), taylor.variable(), builtin_functions())
    .context("Could not compile the original function")?;
  let comparison = Comparison::new(sampling::linspace(cli.from, cli.to, cli.samples), &original)
    .with("taylor", taylor)
    .with("pade", pade);
  let report = comparison.report();
  for deviation in &report.deviations {
    if deviation.non_finite > 0 {
      warn!("{}: {} samples are not finite (pole of the approximation or of the function)", deviation.label, deviation.non_finite);
    }
  }

  if cli.json {
    let output = DemoOutput {
      function: taylor.function().to_string(),
      taylor: TaylorOutput {
        degree: taylor.degree(),
        point: taylor.point(),
        coefficients: taylor.coefficients(),
        series: taylor.series().to_string(),
      },
      pade: PadeOutput {
        order_m: pade.order_m(),
        order_n: pade.order_n(),
        numerator: pade.numerator(),
        denominator: pade.denominator(),
      },
      comparison: report,
      curves: cli.curves.then(|| CurvesOutput {
        x: comparison.grid(),
        values: comparison.series(),
      }),
    };
    let text = serde_json::to_string_pretty(&output).context("Could not serialize the results")?;
    println!("{text}");
  } else {
    info!("Taylor Series Approximation");
    println!("{taylor}");
    info!("Pade Approximation");
    println!("{pade}");
    println!("{report}");
  }
  Ok(())
}
