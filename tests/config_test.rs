//! Integration tests for configuration loading and validation

use nailguard::config::{Config, EXAMPLE_CONFIG};
use nailguard::Error;

#[test]
fn test_example_config_round_trip() {
    let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).expect("example config must parse");

    let serialized = serde_yaml::to_string(&config).expect("config must serialize");
    let reparsed: Config = serde_yaml::from_str(&serialized).expect("serialized config must parse");

    assert_eq!(reparsed.proximity.threshold_px, config.proximity.threshold_px);
    assert_eq!(reparsed.display.window_title, config.display.window_title);
    assert_eq!(reparsed.detection.max_hands, config.detection.max_hands);
    assert_eq!(reparsed.events.window_minutes, config.events.window_minutes);
}

#[test]
fn test_save_and_load_file() {
    let mut config = Config::default();
    config.proximity.threshold_px = 75.0;
    config.display.flip = true;

    let path = std::env::temp_dir().join("nailguard_config_test.yaml");
    config.to_file(&path).expect("config must save");

    let loaded = Config::from_file(&path).expect("config must load");
    assert_eq!(loaded.proximity.threshold_px, 75.0);
    assert!(loaded.display.flip);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_missing_file_errors() {
    let result = Config::from_file("/nonexistent/nailguard.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_load_malformed_yaml_errors() {
    let path = std::env::temp_dir().join("nailguard_malformed_test.yaml");
    std::fs::write(&path, "proximity: [not, a, mapping").unwrap();

    let result = Config::from_file(&path);
    assert!(matches!(result, Err(Error::ConfigError(_))));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_validation_catches_bad_values() {
    let cases: Vec<(&str, Box<dyn Fn(&mut Config)>)> = vec![
        ("negative threshold", Box::new(|c| c.proximity.threshold_px = -1.0)),
        ("zero threshold", Box::new(|c| c.proximity.threshold_px = 0.0)),
        ("zero hands", Box::new(|c| c.detection.max_hands = 0)),
        ("confidence above one", Box::new(|c| c.detection.palm_confidence = 2.0)),
        ("bad anchor", Box::new(|c| c.proximity.mouth_anchor = "chin".to_string())),
        ("bad fallback", Box::new(|c| c.proximity.fallback = "retry".to_string())),
        ("zero window", Box::new(|c| c.events.window_minutes = 0)),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "expected {name} to fail validation");
    }
}

#[test]
fn test_unknown_gui_values_left_to_caller() {
    // The config file never carries the GUI mode; it is a CLI concern.
    // Parsing a config with extra top-level keys must not fail.
    let config: Config = serde_yaml::from_str("gui: full\nproximity:\n  threshold_px: 42.0\n")
        .expect("extra keys are ignored");
    assert_eq!(config.proximity.threshold_px, 42.0);
}
