// engine/tests/config_loading.rs
#![forbid(unsafe_code)]

/**
 * Weights configuration loading.
 *
 * - empty / partial JSON keeps the tuned defaults
 * - malformed JSON and missing files surface as typed errors
 * - non-finite weights are rejected before a search is built
 */
use chetris_engine::config::{ConfigError, WeightsConfig};
use chetris_engine::policy::{BeamConfig, HeuristicWeights, PairWeights};

#[test]
fn empty_object_yields_defaults() {
    let cfg = WeightsConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, WeightsConfig::default());
    assert_eq!(cfg.tetris.height, -0.51);
    assert_eq!(cfg.tetris.lines, 3.6);
    assert_eq!(cfg.puyo.dead_zone, -12.0);
    assert_eq!(cfg.lookahead, BeamConfig::default());
}

#[test]
fn partial_sections_override_only_named_fields() {
    let cfg = WeightsConfig::from_json_str(
        r#"{ "tetris": { "holes": -0.5 }, "puyo": { "color_grouping": 3.0 }, "lookahead": { "narrow": 2 } }"#,
    )
    .unwrap();

    assert_eq!(cfg.tetris.holes, -0.5);
    assert_eq!(cfg.tetris.bumpiness, HeuristicWeights::default().bumpiness);
    assert_eq!(cfg.puyo.color_grouping, 3.0);
    assert_eq!(cfg.puyo.height, PairWeights::default().height);
    assert_eq!(cfg.lookahead.narrow, 2);
    assert_eq!(cfg.lookahead.wide, 5);
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = WeightsConfig::from_json_str("{ \"tetris\": ").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));

    let err = WeightsConfig::from_json_str(r#"{ "tetris": { "holes": "lots" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = WeightsConfig::from_path("/definitely/not/here/weights.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("io error"));
}

#[test]
fn non_finite_weights_are_rejected() {
    let cfg = WeightsConfig {
        tetris: HeuristicWeights {
            max_height: f64::NEG_INFINITY,
            ..HeuristicWeights::default()
        },
        ..WeightsConfig::default()
    };
    match cfg.validate() {
        Err(ConfigError::NonFiniteWeight { name, .. }) => assert_eq!(name, "tetris.max_height"),
        other => panic!("expected NonFiniteWeight, got {other:?}"),
    }
}

#[test]
fn pretty_json_loads_back_unchanged() {
    let mut cfg = WeightsConfig::default();
    cfg.puyo.edge_penalty = -0.75;
    let text = cfg.to_json_pretty().unwrap();
    assert_eq!(WeightsConfig::from_json_str(&text).unwrap(), cfg);
}
