//! FaucetClient - handles communication with the faucet web service.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use super::FaucetError;

/// Claim endpoint of the global signet faucet.
pub const DEFAULT_GLOBAL_FAUCET: &str = "https://signetfaucet.com/claim";

/// Captcha endpoint of the global signet faucet.
pub const DEFAULT_GLOBAL_CAPTCHA: &str = "https://signetfaucet.com/captcha";

/// Hash of block 1 on the global signet chain.
pub const GLOBAL_FIRST_BLOCK_HASH: &str =
    "00000086d6b2636cb2a392d45edc4ec544a10024d30141c9adf4bfd9de533b53";

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP status code for a missing endpoint.
const HTTP_STATUS_NOT_FOUND: u16 = 404;

/// HTTP status code for rate limiting.
const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Statuses below this are treated as success, redirects included.
/// Redirects are returned as-is and never followed.
const HTTP_STATUS_FIRST_ERROR: u16 = 400;

/// Form body of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRequest {
    pub address: String,
    pub password: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

/// Client for a faucet's captcha and claim endpoints.
///
/// Cookies are kept for the lifetime of the client so the captcha answer is
/// submitted in the same session that fetched it.
pub struct FaucetClient {
    http_client: reqwest::Client,
}

impl FaucetClient {
    /// Create a client with default timeouts.
    pub fn new() -> Result<Self, FaucetError> {
        Ok(Self {
            http_client: builder().build()?,
        })
    }

    /// Create a client that connects to `addr` whenever it resolves `host`.
    ///
    /// Useful for faucets on a private network, and for testing against a
    /// mock server while keeping a real domain name in the URL.
    pub fn with_resolved_host(host: &str, addr: SocketAddr) -> Result<Self, FaucetError> {
        Ok(Self {
            http_client: builder().resolve(host, addr).build()?,
        })
    }

    /// Download the raw captcha document.
    pub async fn fetch_challenge(&self, url: &str) -> Result<Vec<u8>, FaucetError> {
        log::info!("Fetching captcha from {}", url);

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FaucetError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Post a claim and return the faucet's reply text on success.
    ///
    /// # Errors
    ///
    /// `FaucetError::NotFound` for 404, `FaucetError::RateLimited` for 429,
    /// `FaucetError::Remote` for any other status of 400 or above, and
    /// `FaucetError::Http` if the request itself fails.
    pub async fn submit_claim(
        &self,
        url: &Url,
        request: &ClaimRequest,
    ) -> Result<String, FaucetError> {
        log::info!(
            "Submitting claim for {} {} to {}",
            request.amount,
            request.address,
            url
        );

        let response = self
            .http_client
            .post(url.clone())
            .form(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        log::debug!("Faucet replied {}: {}", status, body);

        match status {
            s if s < HTTP_STATUS_FIRST_ERROR => Ok(body),
            HTTP_STATUS_NOT_FOUND => Err(FaucetError::NotFound),
            HTTP_STATUS_TOO_MANY_REQUESTS => {
                log::warn!("Rate limited by faucet");
                Err(FaucetError::RateLimited)
            }
            status => Err(FaucetError::Remote { status, body }),
        }
    }
}

fn builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .cookie_store(true)
        // Only the allow-listed URL may receive the claim form
        .redirect(reqwest::redirect::Policy::none())
}
