use std::time::Duration;

use room_tiles::config::TilesSpec;
use room_tiles::generator::{ContentGenerator, fixed_lines};
use room_tiles::surface::MemorySurface;
use room_tiles::{ConfigError, Engine, EngineConfig, PlacementMode, Size, TilesError};

const DASHBOARD: &str = r#"{
    "style": { "background": ["WHITE", "BLUE"], "title": ["BLUE", "WHITE"], "border": true },
    "tiles": [
        {
            "title": "CLOCK",
            "frequency": 0.5,
            "geometry": { "height": 3, "width": 20 },
            "style": { "patterns": [ { "pattern": "[0-9]+", "tokens": ["YELLOW", "BLACK", "BOLD"] } ] }
        },
        {
            "title": "LOG",
            "toggle": { "key": "l", "active": false },
            "geometry": { "height": 6, "width": 30 },
            "action": [ { "pattern": "FATAL", "background": ["WHITE", "RED"], "exit": true } ]
        }
    ]
}"#;

fn generators(count: usize) -> Vec<Box<dyn ContentGenerator>> {
    (0..count)
        .map(|_| Box::new(fixed_lines(["line"])) as Box<dyn ContentGenerator>)
        .collect()
}

fn settings() -> EngineConfig {
    EngineConfig {
        metrics_interval: Duration::ZERO,
        input_poll: Duration::ZERO,
        ..EngineConfig::default()
    }
}

#[test]
fn json_configuration_builds_an_engine() {
    let spec = TilesSpec::from_json_str(DASHBOARD).unwrap();
    assert_eq!(spec.tiles[1].toggle_key(), Some('l'));
    assert!(!spec.tiles[1].starts_active());

    let config = spec.bind(generators(2)).unwrap();
    assert_eq!(config.placement_mode(), PlacementMode::Auto);
    let mut engine = Engine::new(config, MemorySurface::new(Size::new(80, 24)), settings()).unwrap();
    engine.step().unwrap();
    assert!(engine.tile(0).unwrap().has_border());
    assert!(engine.tile(1).unwrap().is_hidden());
    assert!(engine.allocated_styles() > 3);
    engine.shutdown();
}

#[test]
fn generator_count_must_match() {
    let spec = TilesSpec::from_json_str(DASHBOARD).unwrap();
    let err = spec.bind(generators(1)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::GeneratorCount {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn every_problem_is_reported_at_once() {
    let source = r#"{
        "tiles": [
            { "toggle": { "key": "Q" }, "frequency": -1, "geometry": { "height": 2, "width": 2 } },
            { "style": { "body": ["PUCE", "BLACK"] }, "geometry": { "height": 2, "width": 2 },
              "action": [ { "pattern": "(", "halt": true } ] }
        ]
    }"#;
    let config = TilesSpec::from_json_str(source)
        .unwrap()
        .bind(generators(2))
        .unwrap();
    let err = Engine::new(config, MemorySurface::new(Size::new(10, 10)), settings())
        .err()
        .expect("invalid configuration");
    match err {
        TilesError::Config(err) => assert_eq!(err.problems().len(), 4, "{:?}", err.problems()),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_rejected() {
    let err = TilesSpec::from_json_str(r#"{ "tiles": [], "colour": true }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}
