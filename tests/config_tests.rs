//! Configuration module tests
//!
//! Tests for configuration defaults, JSON loading and environment loading.

use blvm_sigscript::config::{KeyConfig, NetworkConfig, ScriptConfig, SigScriptConfig};
use blvm_sigscript::constants::MAX_SCRIPT_SIZE;
use blvm_sigscript::error::SigScriptError;

#[test]
fn test_network_config_default() {
    let config = NetworkConfig::default();
    assert!(!config.testnet);
}

#[test]
fn test_key_config_default() {
    let config = KeyConfig::default();
    assert!(config.compressed_sec);
}

#[test]
fn test_script_config_default() {
    let config = ScriptConfig::default();
    assert_eq!(config.max_script_size, MAX_SCRIPT_SIZE);
    assert_eq!(config.max_script_size, 10_000);
}

#[test]
fn test_sigscript_config_default() {
    let config = SigScriptConfig::default();

    // Verify all sub-configs have defaults
    assert!(!config.network.testnet);
    assert!(config.keys.compressed_sec);
    assert_eq!(config.script.max_script_size, MAX_SCRIPT_SIZE);
}

#[test]
fn test_sigscript_config_from_env() {
    // Test that from_env() doesn't panic
    // Note: Actual env var testing would require setting/unsetting env vars
    let _config = SigScriptConfig::from_env();
}

#[test]
fn test_from_json_empty_object() {
    let config = SigScriptConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SigScriptConfig::default());
}

#[test]
fn test_from_json_partial() {
    let json = r#"{ "keys": { "compressed_sec": false }, "script": {} }"#;
    let config = SigScriptConfig::from_json_str(json).unwrap();

    assert!(!config.keys.compressed_sec);
    assert!(!config.network.testnet);
    assert_eq!(config.script.max_script_size, MAX_SCRIPT_SIZE);
}

#[test]
fn test_from_json_full() {
    let json = r#"{
        "network": { "testnet": true },
        "keys": { "compressed_sec": true },
        "script": { "max_script_size": 20000 }
    }"#;
    let config = SigScriptConfig::from_json_str(json).unwrap();

    assert!(config.network.testnet);
    assert!(config.keys.compressed_sec);
    assert_eq!(config.script.max_script_size, 20_000);
}

#[test]
fn test_from_json_invalid() {
    assert!(matches!(
        SigScriptConfig::from_json_str("{ not json"),
        Err(SigScriptError::Config(_))
    ));
    assert!(matches!(
        SigScriptConfig::from_json_str(r#"{ "script": { "max_script_size": -1 } }"#),
        Err(SigScriptError::Config(_))
    ));
}

#[test]
fn test_config_serde_round_trip() {
    let mut config = SigScriptConfig::default();
    config.network.testnet = true;
    config.script.max_script_size = 4_096;

    let json = serde_json::to_string(&config).unwrap();
    let restored = SigScriptConfig::from_json_str(&json).unwrap();
    assert_eq!(restored, config);
}
