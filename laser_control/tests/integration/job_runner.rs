//! Integration test: job runner end to end.
//!
//! Validates: config + job loading from TOML strings → lines fed through the
//! pipeline → moves executed step by step → laser off → fan stops only once
//! the ring has drained.

use laser_common::config::{ConfigError, ConfigLoader};
use laser_common::laser::config::LaserControlConfig;
use laser_control::config::load_config_from_strings;
use laser_control::cycle::{JobRunner, RunError};
use laser_control::output::SimulatedOutputs;
use laser_control::pipeline::LineOutcome;
use laser_control::ring::PowerRing;
use laser_common::laser::job::JobLine;

const CONFIG_TOML: &str = r#"
[shared]
log_level = "debug"
service_name = "laser-it"

[laser]
fan_on_duty = 128

[runner]
steps_per_tick = 2
move_queue_depth = 4
"#;

const JOB_TOML: &str = r#"
[[lines]]
powers = [10.0, 20.0, 30.0, 40.0]

[[lines]]
powers = [99.0, 99.0]
checksum_ok = false

[[lines]]
powers = [60.0]
motion = false

[[lines]]
powers = [100.0, 100.0, 0.0]

[[lines]]
powers = []
steps = 3
"#;

#[test]
fn job_runs_to_completion() {
    let loaded = load_config_from_strings(CONFIG_TOML, JOB_TOML).unwrap();
    let mut ring = PowerRing::<64>::new();
    let mut runner =
        JobRunner::new(&mut ring, SimulatedOutputs::new(), &loaded.config).unwrap();

    let stats = runner.run(&loaded.job).unwrap();

    assert_eq!(stats.pipeline.lines, 5);
    assert_eq!(stats.pipeline.queued, 3);
    assert_eq!(stats.pipeline.rejected, 1);
    assert_eq!(stats.pipeline.rolled_back, 1);
    assert_eq!(stats.pipeline.samples_dropped, 0);
    assert_eq!(stats.moves_completed, 3);
    assert_eq!(stats.steps, 4 + 3 + 3);

    assert!(runner.ring().is_empty());
    assert!(!runner.actuator().is_laser_on());
    assert!(!runner.actuator().is_fan_on());
    assert_eq!(runner.actuator().outputs().laser(), 0);
    assert!(stats.fan_on_ticks > 0);
}

#[test]
fn steps_apply_claimed_powers_in_order() {
    let loaded = load_config_from_strings(CONFIG_TOML, "").unwrap();
    let mut config = loaded.config;
    config.runner.steps_per_tick = 1;

    let mut ring = PowerRing::<64>::new();
    let mut runner = JobRunner::new(&mut ring, SimulatedOutputs::new(), &config).unwrap();

    // Feeding ticks once: the first step runs immediately.
    let outcome = runner.feed(&JobLine::moving(&[10.0, 50.0, 100.0])).unwrap();
    assert!(matches!(outcome, LineOutcome::Queued(span) if span.len == 3));
    assert_eq!(runner.actuator().power(), 26);

    runner.tick();
    assert_eq!(runner.actuator().power(), 128);
    runner.tick();
    assert_eq!(runner.actuator().power(), 255);
    assert!(runner.actuator().is_fan_on());
    assert!(!runner.is_moving());
}

#[test]
fn fan_runs_until_ring_drains() {
    let loaded = load_config_from_strings(CONFIG_TOML, "").unwrap();
    let mut config = loaded.config;
    config.runner.steps_per_tick = 1;

    let mut ring = PowerRing::<64>::new();
    let mut runner = JobRunner::new(&mut ring, SimulatedOutputs::new(), &config).unwrap();

    // Last power of the first move is 0: laser off while the second move's
    // values are still claimed.
    runner.feed(&JobLine::moving(&[50.0, 0.0])).unwrap();
    runner.feed(&JobLine::moving(&[0.0, 0.0, 0.0])).unwrap();
    assert!(!runner.actuator().is_laser_on());
    assert!(!runner.ring().is_empty());
    assert!(runner.actuator().is_fan_on());

    runner.drain();
    assert!(runner.ring().is_empty());
    assert!(!runner.actuator().is_fan_on());
}

#[test]
fn overflow_drops_values_but_keeps_moving() {
    let loaded = load_config_from_strings(CONFIG_TOML, "").unwrap();
    let mut ring = PowerRing::<8>::new();
    let mut runner =
        JobRunner::new(&mut ring, SimulatedOutputs::new(), &loaded.config).unwrap();

    let outcome = runner.feed(&JobLine::moving(&[50.0; 12])).unwrap();
    assert!(matches!(outcome, LineOutcome::Queued(span) if span.len == 7));
    runner.drain();

    let stats = runner.stats();
    assert_eq!(stats.pipeline.samples_dropped, 5);
    assert_eq!(stats.steps, 12);
    assert_eq!(stats.moves_completed, 1);
    assert_eq!(runner.ring().dropped(), 5);
}

#[test]
fn head_removal_shuts_down_mid_job() {
    let loaded = load_config_from_strings(CONFIG_TOML, "").unwrap();
    let mut ring = PowerRing::<64>::new();
    let mut runner =
        JobRunner::new(&mut ring, SimulatedOutputs::new(), &loaded.config).unwrap();

    runner.feed(&JobLine::moving(&[80.0; 10])).unwrap();
    assert!(runner.actuator().is_laser_on());

    runner.actuator_mut().disable_laser();
    assert!(!runner.actuator().is_laser_on());
    assert!(!runner.actuator().is_fan_on());
    assert_eq!(runner.actuator().outputs().fan(), 0);
    assert!(!runner.ring().is_empty());
}

#[test]
fn unvalidated_config_is_refused_by_the_runner() {
    // `from_toml` parses without validating; the runner must not accept it.
    let stalled = LaserControlConfig::from_toml(
        "[shared]\nservice_name = \"laser-it\"\n[runner]\nsteps_per_tick = 0\n",
    )
    .unwrap();
    let mut ring = PowerRing::<64>::new();
    let result = JobRunner::new(&mut ring, SimulatedOutputs::new(), &stalled);
    assert!(matches!(
        result,
        Err(RunError::Config(ConfigError::ValidationError(_)))
    ));

    let oversized = LaserControlConfig::from_toml(
        "[shared]\nservice_name = \"laser-it\"\n[runner]\nmove_queue_depth = 100\n",
    )
    .unwrap();
    let mut ring = PowerRing::<64>::new();
    let result = JobRunner::new(&mut ring, SimulatedOutputs::new(), &oversized);
    assert!(matches!(
        result,
        Err(RunError::Config(ConfigError::ValidationError(_)))
    ));
}
