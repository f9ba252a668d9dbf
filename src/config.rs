//! Configuration for blvm-sigscript
//!
//! A handful of knobs for key encoding, network defaults and parser bounds.
//! Settings can be loaded from JSON, environment variables, or passed
//! programmatically.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::constants::MAX_SCRIPT_SIZE;
use crate::error::{Result, SigScriptError};

/// Network defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    /// Use testnet version bytes where a caller does not choose explicitly
    /// Default: false (mainnet)
    #[serde(default)]
    pub testnet: bool,
}

/// Key encoding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// SEC form placed in unlocking scripts by `Tx::sign_input`
    /// Default: true (33-byte compressed keys)
    #[serde(default = "default_true")]
    pub compressed_sec: bool,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            compressed_sec: true,
        }
    }
}

/// Script parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Largest declared script length `Script::parse` will accept
    /// Default: 10,000 bytes
    #[serde(default = "default_max_script_size")]
    pub max_script_size: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_script_size: MAX_SCRIPT_SIZE,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_script_size() -> usize {
    MAX_SCRIPT_SIZE
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SigScriptConfig {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub keys: KeyConfig,

    #[serde(default)]
    pub script: ScriptConfig,
}

impl SigScriptConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: `BLVM_SIGSCRIPT_<SECTION>_<KEY>`
    ///
    /// Examples:
    /// - `BLVM_SIGSCRIPT_NETWORK_TESTNET=true`
    /// - `BLVM_SIGSCRIPT_KEYS_COMPRESSED_SEC=false`
    /// - `BLVM_SIGSCRIPT_SCRIPT_MAX_SCRIPT_SIZE=20000`
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BLVM_SIGSCRIPT_NETWORK_TESTNET") {
            if let Ok(testnet) = val.parse::<bool>() {
                config.network.testnet = testnet;
            }
        }

        if let Ok(val) = std::env::var("BLVM_SIGSCRIPT_KEYS_COMPRESSED_SEC") {
            if let Ok(compressed) = val.parse::<bool>() {
                config.keys.compressed_sec = compressed;
            }
        }

        if let Ok(val) = std::env::var("BLVM_SIGSCRIPT_SCRIPT_MAX_SCRIPT_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.script.max_script_size = size;
            }
        }

        config
    }

    /// Parse a JSON document; missing sections and fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SigScriptError::Config(e.to_string().into()))
    }
}

/// Global configuration instance
static GLOBAL_CONFIG: OnceLock<SigScriptConfig> = OnceLock::new();

/// Install the global configuration
///
/// Must run before the first `get_config` call; afterwards the configuration is
/// fixed and this returns `Err(Config)`.
pub fn init_config(config: SigScriptConfig) -> Result<()> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| SigScriptError::Config("configuration already initialized".into()))
}

/// Global configuration, falling back to `from_env()` when never initialized
pub fn get_config() -> &'static SigScriptConfig {
    GLOBAL_CONFIG.get_or_init(SigScriptConfig::from_env)
}
