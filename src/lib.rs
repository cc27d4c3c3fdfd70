//! getcoins library crate.
//!
//! Requests signet coins from a faucet for a local wallet, solving the
//! faucet's captcha in the terminal when one is served. The modules are
//! exposed for the binary and for integration testing.

pub mod ascii;
pub mod challenge;
pub mod cli;
pub mod config;
pub mod faucet;
pub mod pipeline;
pub mod wallet;
