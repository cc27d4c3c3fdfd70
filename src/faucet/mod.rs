//! Faucet HTTP integration: claim URL allow-list, captcha fetch and claim
//! submission.

mod allow_list;
mod client;

pub use allow_list::{is_valid_domain, AllowList, DEFAULT_ALLOWED_HOSTS};
pub use client::{
    ClaimRequest, FaucetClient, DEFAULT_GLOBAL_CAPTCHA, DEFAULT_GLOBAL_FAUCET,
    GLOBAL_FIRST_BLOCK_HASH,
};

/// Errors that can occur while talking to a faucet.
#[derive(Debug, thiserror::Error)]
pub enum FaucetError {
    #[error("Invalid faucet URL {url}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    #[error("Untrusted faucet URL {url}: host {host} is not in the allow-list")]
    UntrustedUrl { url: String, host: String },

    #[error("Unexpected error when contacting faucet: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The specified faucet URL does not exist. Please check for any server issues/typo.")]
    NotFound,

    #[error("The faucet is rate-limited to 1 request/IP/day, so repeated claims are refused. You can visit the faucet website to get more coins manually.")]
    RateLimited,

    #[error("Returned Error Code {status}\n{body}\nPlease check the provided arguments for their validity and/or any possible typo.")]
    Remote { status: u16, body: String },
}
