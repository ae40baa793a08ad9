//! Demo/benchmark binary: runs a handful of worked expressions through
//! `zhad-core` and checks their derivatives against hand-computed values,
//! then re-evaluates one expression repeatedly to demonstrate arena reuse.

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zhad_core::{acos, asin, cos, exp, inv, log, pow, sin, sqrt, square, tan, DepVar, IndepVar, ZhadError};

/// Runs the zhad-core worked examples and a reuse benchmark.
#[derive(Parser, Debug)]
#[command(name = "zhad-demo", version, about)]
struct Cli {
    /// Number of times to re-evaluate the benchmark expression.
    #[arg(default_value_t = 1, value_parser = parse_iterations)]
    iterations: u64,
}

fn parse_iterations(raw: &str) -> Result<u64, ZhadError> {
    raw.parse::<u64>().map_err(ZhadError::from)
}

fn near_eq(actual: f64, expected: f64, label: &str) {
    let tolerance = 1e-8;
    if (actual - expected).abs() > tolerance {
        panic!("{label}: expected {expected}, got {actual}");
    }
    tracing::info!(label, actual, expected, "ok");
}

fn scenario_add() {
    let mut xs = [IndepVar::new(), IndepVar::new()];
    xs[0].set(3.0);
    xs[1].set(4.0);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(xs[0].v() + xs[1].v());

    near_eq(y.value(), 7.0, "add/value");
    near_eq(y.derivative1(&xs[0]), 1.0, "add/d_dx0");
    near_eq(y.derivative1(&xs[1]), 1.0, "add/d_dx1");
    near_eq(y.derivative2(&xs[0], &xs[1]), 0.0, "add/d2_dx0dx1");
}

fn scenario_product_of_squares() {
    let mut xs = [IndepVar::new(), IndepVar::new()];
    xs[0].set(2.0);
    xs[1].set(3.0);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(&square(xs[0].v()) * &square(xs[1].v()));

    near_eq(y.value(), 36.0, "product_of_squares/value");
    near_eq(y.derivative1(&xs[0]), 36.0, "product_of_squares/d_dx0");
    near_eq(y.derivative1(&xs[1]), 24.0, "product_of_squares/d_dx1");
}

fn scenario_division() {
    let mut xs = [IndepVar::new(), IndepVar::new()];
    xs[0].set(10.0);
    xs[1].set(4.0);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(xs[0].v() / xs[1].v());

    near_eq(y.value(), 2.5, "division/value");
    near_eq(y.derivative1(&xs[0]), 1.0 / 4.0, "division/d_dx0");
    near_eq(y.derivative1(&xs[1]), -10.0 / 16.0, "division/d_dx1");
    let _ = inv(xs[0].v());
}

fn scenario_sqrt() {
    let mut xs = [IndepVar::new()];
    xs[0].set(9.0);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(sqrt(xs[0].v()));

    near_eq(y.value(), 3.0, "sqrt/value");
    near_eq(y.derivative1(&xs[0]), 1.0 / 6.0, "sqrt/d_dx0");
}

fn scenario_pow() {
    let mut xs = [IndepVar::new()];
    xs[0].set(2.0);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(pow(xs[0].v(), 3.0));

    near_eq(y.value(), 8.0, "pow/value");
    near_eq(y.derivative1(&xs[0]), 12.0, "pow/d_dx0");
    near_eq(y.derivative2(&xs[0], &xs[0]), 12.0, "pow/d2_dx0dx0");
    let _ = (log(xs[0].v()), exp(xs[0].v()));
}

fn scenario_sin_product() {
    let mut xs = [IndepVar::new(), IndepVar::new()];
    xs[0].set(0.5);
    xs[1].set(1.5);
    let mut y = DepVar::new();
    y.depend_on(&mut xs);
    y.assign(&sin(xs[0].v()) * &cos(xs[1].v()));

    let expected = xs[0].value().sin() * xs[1].value().cos();
    near_eq(y.value(), expected, "sin_product/value");
    let d_dx0 = xs[0].value().cos() * xs[1].value().cos();
    near_eq(y.derivative1(&xs[0]), d_dx0, "sin_product/d_dx0");
    let _ = (tan(xs[0].v()), asin(xs[0].v()), acos(xs[0].v()));
}

fn run_scenarios() {
    scenario_add();
    scenario_product_of_squares();
    scenario_division();
    scenario_sqrt();
    scenario_pow();
    scenario_sin_product();
}

/// Re-evaluates one expression `iterations` times against a single
/// `DepVar`, demonstrating that the arena reuses its physical capacity
/// instead of reallocating on every call.
fn run_reuse_benchmark(iterations: u64) {
    let mut xs = [IndepVar::new(), IndepVar::new(), IndepVar::new()];
    let mut y = DepVar::new();
    y.depend_on(&mut xs);

    let start = Instant::now();
    for i in 0..iterations.max(1) {
        xs[0].set(i as f64 * 0.001);
        xs[1].set(1.0 + i as f64 * 0.002);
        xs[2].set(2.0 - i as f64 * 0.001);
        let expr = &(xs[0].v() + xs[1].v()) * xs[2].v();
        y.assign(expr);
    }
    let elapsed = start.elapsed();
    tracing::info!(iterations, ?elapsed, "reuse benchmark finished");
    println!(
        "ran {iterations} evaluations of one expression in {elapsed:?} (final value = {})",
        y.value()
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run_scenarios();
    run_reuse_benchmark(cli.iterations);
}
