//! Configuration file handling for getcoins.
//!
//! Loads optional defaults from `~/.config/getcoins/config.toml` or a custom
//! path, and merges them with command-line flags into [`Settings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::challenge::DEFAULT_CONVERTER;
use crate::cli::Args;
use crate::faucet::{DEFAULT_GLOBAL_CAPTCHA, DEFAULT_GLOBAL_FAUCET};
use crate::wallet::DEFAULT_WALLET_COMMAND;

/// Environment variable consulted when no password flag or config entry is set.
pub const PASSWORD_ENV: &str = "FAUCET_PASSWORD";

/// Default amount to request.
pub const DEFAULT_AMOUNT: &str = "0.001";

/// Configuration file structure for getcoins.
/// Loaded from ~/.config/getcoins/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub faucet: FaucetConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub allow_list: AllowListConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct WalletConfig {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct FaucetConfig {
    pub url: Option<String>,
    pub captcha_url: Option<String>,
    pub amount: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConverterConfig {
    pub program: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AllowListConfig {
    /// Hosts permitted in addition to the built-in ones.
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// With no path, the default location is tried and a missing file yields
    /// the default config. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::NotFound { path });
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Fully resolved options for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub wallet_command: String,
    pub wallet_args: Vec<String>,
    pub faucet_url: String,
    /// Empty means no captcha.
    pub captcha_url: String,
    /// Empty means ask the wallet for a new address.
    pub address: String,
    pub password: String,
    pub amount: String,
    pub converter: String,
    pub extra_allowed_hosts: Vec<String>,
}

impl Settings {
    /// Merge flags, config file and environment. Flags win over the config
    /// file, which wins over built-in defaults.
    pub fn resolve(args: &Args, config: &Config, env_password: Option<String>) -> Self {
        let pick = |flag: &Option<String>, file: &Option<String>, default: &str| {
            flag.clone()
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        };

        let wallet_args = if !args.bitcoin_cli_args.is_empty() {
            args.bitcoin_cli_args.clone()
        } else {
            config.wallet.args.clone()
        };

        let password = args
            .password
            .clone()
            .or_else(|| config.faucet.password.clone())
            .or(env_password)
            .unwrap_or_default();

        Self {
            wallet_command: pick(&args.cmd, &config.wallet.command, DEFAULT_WALLET_COMMAND),
            wallet_args,
            faucet_url: pick(&args.faucet, &config.faucet.url, DEFAULT_GLOBAL_FAUCET),
            captcha_url: pick(&args.captcha, &config.faucet.captcha_url, DEFAULT_GLOBAL_CAPTCHA),
            address: args.addr.clone().unwrap_or_default(),
            password,
            amount: pick(&args.amount, &config.faucet.amount, DEFAULT_AMOUNT),
            converter: pick(&args.imagemagick, &config.converter.program, DEFAULT_CONVERTER),
            extra_allowed_hosts: config.allow_list.hosts.clone(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    NotFound {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound { path } => {
                write!(f, "Config file not found: '{}'", path.display())
            }
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NotFound { .. } => None,
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("getcoins").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/getcoins/config.toml")
        })
}
