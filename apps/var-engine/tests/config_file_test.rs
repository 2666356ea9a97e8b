//! Integration tests for loading run configuration from disk.

use std::io::Write;

use var_engine::bench;
use var_engine::config::{ConfigError, ReportFormat, load_config};
use var_engine::Strategy;

#[test]
fn test_load_config_file_and_sweep() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r"
simulation:
  trial_sizes: [2000]
  num_assets: ${{VAR_ENGINE_TEST_UNSET_ASSETS:-5}}
  confidence_level: 0.9
  seed: 17
execution:
  max_threads: 2
strategies: [SEQUENTIAL, DATA_PARALLEL]
report:
  format: json
"
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let config = load_config(Some(path)).unwrap();
    assert_eq!(config.simulation.num_assets, 5);
    assert_eq!(config.report.format, ReportFormat::Json);

    let report = bench::sweep(&config.sweep_plan()).unwrap();
    let comparison = &report.comparisons[0];
    assert_eq!(comparison.num_trials, 2000);
    assert_eq!(comparison.timings.len(), 2);
    assert_eq!(comparison.timings[1].strategy, Strategy::DataParallel);
    assert_eq!(comparison.timings[1].concurrency, 2);
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "simulation: [not, a, mapping").unwrap();

    let path = file.path().to_str().unwrap();
    assert!(matches!(
        load_config(Some(path)),
        Err(ConfigError::ParseError(_))
    ));
}
