//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, 0);
    assert_eq!(config.mcts.iterations, 1000);
    assert_eq!(config.mcts.variant, "modified");
    assert_eq!(config.play.games, 100);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert!((config.mcts.exploration_constant - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert_eq!(config.mcts.trees, 1);
    assert_eq!(config.mcts.time_limit_ms, 0);
}

#[test]
fn test_play_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.play.x_variant, "modified");
    assert_eq!(config.play.o_variant, "baseline");
    assert_eq!(config.play.log_interval, 10);
}

#[test]
fn test_env_overrides() {
    // Keys used only by this test so parallel tests are unaffected
    std::env::set_var("UTTT_MCTS_TREES", "4");
    std::env::set_var("UTTT_PLAY_O_VARIANT", "modified");
    std::env::set_var("UTTT_PLAY_LOG_INTERVAL", "not-a-number");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.trees, 4);
    assert_eq!(config.play.o_variant, "modified");
    // Unparseable values are ignored
    assert_eq!(config.play.log_interval, 10);

    std::env::remove_var("UTTT_MCTS_TREES");
    std::env::remove_var("UTTT_PLAY_O_VARIANT");
    std::env::remove_var("UTTT_PLAY_LOG_INTERVAL");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"
seed = 42

[mcts]
iterations = 250
variant = "baseline"
time_limit_ms = 500

[play]
games = 8
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.common.seed, 42);
    assert_eq!(config.mcts.iterations, 250);
    assert_eq!(config.mcts.variant, "baseline");
    assert_eq!(config.mcts.time_limit_ms, 500);
    assert_eq!(config.play.games, 8);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
iterations = 50
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.iterations, 50);
    assert_eq!(config.mcts.variant, "modified"); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.play.games, 100); // Default
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[common]\nseed = 99\n\n[play]\ngames = 3").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.common.seed, 99);
    assert_eq!(config.play.games, 3);
    assert_eq!(config.mcts.iterations, 1000);
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[mcts\niterations = ").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.mcts.iterations, 1000);

    let missing = load_from_path(std::path::Path::new("/nonexistent/uttt/config.toml"));
    assert_eq!(missing.play.games, 100);
}
