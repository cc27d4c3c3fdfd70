//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

/// Request signet coins from a faucet for a local bitcoin node
#[derive(Parser, Debug)]
#[command(name = "getcoins")]
#[command(version, about = "Script to get coins from a faucet.", long_about = None)]
#[command(
    after_help = "You may need to start with double-dash (--) when providing bitcoin-cli arguments."
)]
pub struct Args {
    /// bitcoin-cli command to use [default: bitcoin-cli]
    #[arg(short = 'c', long = "cmd")]
    pub cmd: Option<String>,

    /// URL of the faucet [default: https://signetfaucet.com/claim]
    #[arg(short = 'f', long)]
    pub faucet: Option<String>,

    /// URL of the faucet captcha, or empty if no captcha is needed
    /// [default: https://signetfaucet.com/captcha]
    #[arg(short = 'g', long)]
    pub captcha: Option<String>,

    /// Bitcoin address to which the faucet should send (default: new wallet address)
    #[arg(short = 'a', long = "addr")]
    pub addr: Option<String>,

    /// Faucet password, if any (falls back to $FAUCET_PASSWORD)
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Amount to request (0.001-0.1) [default: 0.001]
    #[arg(short = 'n', long)]
    pub amount: Option<String>,

    /// Path to imagemagick convert utility [default: convert]
    #[arg(short = 'i', long = "imagemagick")]
    pub imagemagick: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Arguments to pass on to bitcoin-cli (default: -signet)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub bitcoin_cli_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["getcoins"]);
        assert!(args.cmd.is_none());
        assert!(args.faucet.is_none());
        assert!(args.captcha.is_none());
        assert!(args.addr.is_none());
        assert!(args.password.is_none());
        assert!(args.amount.is_none());
        assert!(args.imagemagick.is_none());
        assert!(args.config.is_none());
        assert!(args.bitcoin_cli_args.is_empty());
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from([
            "getcoins",
            "-c",
            "/opt/bin/bitcoin-cli",
            "-f",
            "https://faucet.example.org/claim",
            "-g",
            "",
            "-a",
            "tb1qexample",
            "-p",
            "hunter2",
            "-n",
            "0.05",
            "-i",
            "magick",
        ]);
        assert_eq!(args.cmd.as_deref(), Some("/opt/bin/bitcoin-cli"));
        assert_eq!(args.faucet.as_deref(), Some("https://faucet.example.org/claim"));
        assert_eq!(args.captcha.as_deref(), Some(""));
        assert_eq!(args.addr.as_deref(), Some("tb1qexample"));
        assert_eq!(args.password.as_deref(), Some("hunter2"));
        assert_eq!(args.amount.as_deref(), Some("0.05"));
        assert_eq!(args.imagemagick.as_deref(), Some("magick"));
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "getcoins",
            "--cmd",
            "elements-cli",
            "--addr",
            "tb1qexample",
            "--imagemagick",
            "/usr/bin/convert",
            "--config",
            "/tmp/getcoins.toml",
        ]);
        assert_eq!(args.cmd.as_deref(), Some("elements-cli"));
        assert_eq!(args.addr.as_deref(), Some("tb1qexample"));
        assert_eq!(args.imagemagick.as_deref(), Some("/usr/bin/convert"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/getcoins.toml")));
    }

    #[test]
    fn test_args_wallet_passthrough_after_double_dash() {
        let args = Args::parse_from(["getcoins", "-n", "0.01", "--", "-datadir=/tmp/x", "-signet"]);
        assert_eq!(args.amount.as_deref(), Some("0.01"));
        assert_eq!(args.bitcoin_cli_args, vec!["-datadir=/tmp/x", "-signet"]);
    }
}
