//! Probe configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment variables and flags (clap folds those two together).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use futchain_harness::sampler::DEFAULT_ITERATIONS;
use futchain_harness::PRECOMPILE_ADDRESS;

/// Local node started by the chain's dev tooling.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub rpc_url: Option<String>,
    pub precompile_address: Option<String>,
    pub abi_path: Option<PathBuf>,
    pub iterations: Option<u32>,
}

impl FileConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        toml::from_str(s).map_err(|e| format!("Invalid config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub precompile_address: Option<String>,
    pub abi_path: Option<PathBuf>,
    pub iterations: Option<u32>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rpc_url: String,
    pub precompile_address: String,
    /// `None` means the ABI embedded in the harness.
    pub abi_path: Option<PathBuf>,
    pub iterations: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            precompile_address: PRECOMPILE_ADDRESS.to_string(),
            abi_path: None,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Settings {
    /// Layer `file` and then `overrides` on top of the defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let defaults = Settings::default();
        Self {
            rpc_url: overrides
                .rpc_url
                .or(file.rpc_url)
                .unwrap_or(defaults.rpc_url),
            precompile_address: overrides
                .precompile_address
                .or(file.precompile_address)
                .unwrap_or(defaults.precompile_address),
            abi_path: overrides.abi_path.or(file.abi_path),
            iterations: overrides
                .iterations
                .or(file.iterations)
                .unwrap_or(defaults.iterations),
        }
    }
}
