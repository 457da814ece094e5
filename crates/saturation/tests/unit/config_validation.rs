//! Tests for configuration validation.
//!
//! Builder methods reject nonsensical values with a panic; engines reject
//! configurations assembled any other way with `Error::InvalidConfig`.

use saturation::{CoverageEngine, Error, InterviewConfig, MissingMassSimulator, SimulationConfig};

// =============================================================================
// BUILDER PANICS
// =============================================================================

#[test]
#[should_panic(expected = "population must be positive")]
fn population_zero_panics() {
    let _ = SimulationConfig::new().population(0);
}

#[test]
#[should_panic(expected = "n_max must be positive")]
fn n_max_zero_panics() {
    let _ = SimulationConfig::new().n_max(0);
}

#[test]
#[should_panic(expected = "p_max must be in (0, 1]")]
fn p_max_above_one_panics() {
    let _ = SimulationConfig::new().p_max(1.5);
}

#[test]
#[should_panic(expected = "p_floor must be < p_max")]
fn p_floor_above_max_panics() {
    let _ = SimulationConfig::new().p_floor(0.5);
}

#[test]
#[should_panic(expected = "themes must be positive")]
fn themes_zero_panics() {
    let _ = InterviewConfig::new().themes(0);
}

#[test]
#[should_panic(expected = "mean_tokens must be positive")]
fn mean_tokens_nan_panics() {
    let _ = InterviewConfig::new().mean_tokens(f64::NAN);
}

// =============================================================================
// ENGINE CONSTRUCTION
// =============================================================================

#[test]
fn engine_rejects_zero_experiments() {
    let config = SimulationConfig {
        experiments: 0,
        ..Default::default()
    };
    assert!(matches!(CoverageEngine::new(config), Err(Error::InvalidConfig(_))));
}

#[test]
fn engine_rejects_deserialized_tolerance() {
    let config: SimulationConfig = serde_json::from_str(r#"{"p_tolerance": -1.0}"#).unwrap();
    assert!(matches!(CoverageEngine::new(config), Err(Error::InvalidConfig(_))));
}

#[test]
fn simulator_rejects_bad_interview_shape() {
    let interviews = InterviewConfig {
        zipf_exponent: -0.5,
        ..Default::default()
    };
    assert!(matches!(
        MissingMassSimulator::new(SimulationConfig::quick(), interviews),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn presets_construct_engines() {
    for config in [
        SimulationConfig::quick(),
        SimulationConfig::balanced(),
        SimulationConfig::thorough(),
        SimulationConfig::calibration(),
    ] {
        let engine = CoverageEngine::new(config.clone()).unwrap();
        assert_eq!(engine.config(), &config);
    }
}

#[test]
fn config_serializes_roundtrip() {
    let config = SimulationConfig::quick().population(300).seed(11);
    let json = saturation::output::to_json(&config).unwrap();
    let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
