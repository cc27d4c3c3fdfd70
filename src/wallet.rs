//! Wallet CLI collaborator.
//!
//! Runs `bitcoin-cli` (or a compatible command) with the user's connection
//! arguments followed by an RPC call, and returns its trimmed stdout.

use std::process::{Command, Stdio};

/// Default wallet command.
pub const DEFAULT_WALLET_COMMAND: &str = "bitcoin-cli";

/// Connection arguments used when none are given.
pub const DEFAULT_WALLET_ARGS: &[&str] = &["-signet"];

/// Errors from invoking the wallet CLI.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("The binary {command} could not be found")]
    NotFound { command: String },

    #[error("-----\nError while calling {cmdline} (see output above).")]
    Failed { cmdline: String },

    #[error("Failed to run {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} returned non-UTF-8 output")]
    InvalidOutput { command: String },
}

/// A wallet command line plus the arguments that select its network.
#[derive(Debug, Clone)]
pub struct WalletCli {
    command: String,
    args: Vec<String>,
}

impl Default for WalletCli {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET_COMMAND, Vec::new())
    }
}

impl WalletCli {
    /// Create a wallet collaborator. Empty `args` fall back to
    /// [`DEFAULT_WALLET_ARGS`].
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let args = if args.is_empty() {
            DEFAULT_WALLET_ARGS.iter().map(|s| s.to_string()).collect()
        } else {
            args
        };
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build the full argv for an RPC call.
    pub fn argv(&self, rpc: &[&str]) -> Vec<String> {
        std::iter::once(self.command.clone())
            .chain(self.args.iter().cloned())
            .chain(rpc.iter().map(|s| s.to_string()))
            .collect()
    }

    /// Run an RPC call and return stdout with surrounding whitespace removed.
    ///
    /// The wallet's stderr is passed through so its own error message reaches
    /// the user before ours.
    pub fn call(&self, rpc: &[&str]) -> Result<String, WalletError> {
        log::debug!("Calling wallet: {}", self.argv(rpc).join(" "));

        let output = Command::new(&self.command)
            .args(&self.args)
            .args(rpc)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    WalletError::NotFound {
                        command: self.command.clone(),
                    }
                } else {
                    WalletError::Io {
                        command: self.command.clone(),
                        source: e,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(WalletError::Failed {
                cmdline: self.argv(rpc).join(" "),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| WalletError::InvalidOutput {
            command: self.command.clone(),
        })?;
        Ok(stdout.trim().to_string())
    }

    /// `getblockhash <height>`
    pub fn get_block_hash(&self, height: u64) -> Result<String, WalletError> {
        self.call(&["getblockhash", &height.to_string()])
    }

    /// `getnewaddress <label> <address_type>`
    pub fn get_new_address(&self, label: &str, address_type: &str) -> Result<String, WalletError> {
        self.call(&["getnewaddress", label, address_type])
    }
}
