//! Statistical equivalence of the three execution strategies.
//!
//! The strategies draw from independent generators, so their VaR figures
//! are independent samples of the same quantile rather than identical
//! numbers.

use var_engine::simulation::{Engine, ExecutionConfig, SimulationConfig, Strategy};
use var_engine::Portfolio;

const NUM_TRIALS: usize = 1_000_000;
const RELATIVE_TOLERANCE: f64 = 0.02;

fn fixed_portfolio() -> Portfolio {
    Portfolio::new(
        vec![0.4, 0.35, 0.25],
        vec![0.05, 0.04, 0.06],
        vec![0.1, 0.15, 0.08],
    )
    .unwrap()
}

#[test]
fn test_strategies_agree_on_var() {
    let config = SimulationConfig::new(NUM_TRIALS, 3, 0.95).unwrap();
    let mut engine = Engine::with_portfolio(config, fixed_portfolio())
        .unwrap()
        .with_execution(ExecutionConfig { max_threads: 4 });

    let vars: Vec<(Strategy, f64)> = Strategy::ALL
        .iter()
        .map(|&s| {
            engine.run(s).unwrap();
            assert_eq!(engine.losses().unwrap().len(), NUM_TRIALS);
            (s, engine.value_at_risk().unwrap())
        })
        .collect();

    let baseline = vars[0].1;
    for (strategy, var) in &vars[1..] {
        let relative = ((var - baseline) / baseline).abs();
        assert!(
            relative < RELATIVE_TOLERANCE,
            "{strategy} VaR {var} differs from sequential {baseline} by {:.3}%",
            relative * 100.0
        );
    }
}

#[test]
fn test_var_matches_analytic_quantile() {
    // Portfolio return ~ Normal(0.049, sqrt(0.00475625)); loss is its negation.
    let mean = 0.049_f64;
    let std_dev = 0.004_756_25_f64.sqrt();
    // 5th percentile of the loss distribution.
    let expected = -mean - 1.644_853_6 * std_dev;

    let config = SimulationConfig::new(NUM_TRIALS, 3, 0.95).unwrap();
    let mut engine = Engine::with_portfolio(config, fixed_portfolio()).unwrap();
    engine.run(Strategy::TaskParallel).unwrap();

    let summary = engine.risk_summary().unwrap();
    assert!(((summary.var - expected) / expected).abs() < RELATIVE_TOLERANCE);
    assert!((summary.mean + mean).abs() < 1e-3);
    assert!(((summary.std_dev - std_dev) / std_dev).abs() < RELATIVE_TOLERANCE);
    assert!(summary.expected_shortfall <= summary.var);
}

#[test]
fn test_no_slot_left_unwritten() {
    let config = SimulationConfig::new(100_000, 3, 0.95).unwrap();
    let mut engine = Engine::with_portfolio(config, fixed_portfolio()).unwrap();

    for strategy in Strategy::ALL {
        engine.run(strategy).unwrap();
        let losses = engine.losses().unwrap();
        assert_eq!(losses.len(), 100_000);
        assert!(losses.iter().all(|l| l.is_finite()), "{strategy} left a slot unset");
    }
}
