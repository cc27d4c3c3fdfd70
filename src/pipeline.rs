//! The claim pipeline: validate the faucet URL, check the network, resolve a
//! receiving address, solve the captcha if there is one, then submit.
//!
//! Every step returns early on failure; at most one claim is posted.

use std::io::{self, BufRead, Write};

use crate::ascii::braille::{render_to_string, DEFAULT_THRESHOLD};
use crate::challenge::{self, ChallengeError, ImageConverter};
use crate::config::Settings;
use crate::faucet::{
    AllowList, ClaimRequest, FaucetClient, FaucetError, DEFAULT_GLOBAL_CAPTCHA,
    DEFAULT_GLOBAL_FAUCET, GLOBAL_FIRST_BLOCK_HASH,
};
use crate::wallet::{WalletCli, WalletError};

/// Label given to addresses created for faucet claims.
pub const ADDRESS_LABEL: &str = "faucet";

/// Address type requested from the wallet.
pub const ADDRESS_TYPE: &str = "bech32";

/// Errors that abort a claim.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Faucet(#[from] FaucetError),

    #[error(transparent)]
    Challenge(#[from] ChallengeError),

    #[error("The global faucet cannot be used with a custom Signet network (block 1 is {block_hash}). Please use the global signet or setup your custom faucet to use this functionality.")]
    WrongNetwork { block_hash: String },

    #[error("Failed to read captcha answer: {0}")]
    Operator(#[source] io::Error),
}

/// The human solving the captcha.
pub trait Operator {
    /// Display text, followed by a newline.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Print `prompt` and read one line of input, without its line ending.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// An [`Operator`] on a terminal (or any reader/writer pair).
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl Terminal<io::StdinLock<'static>, io::Stdout> {
    /// The process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Operator for Terminal<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Run one claim and return the faucet's success reply.
pub async fn run<O: Operator>(
    settings: &Settings,
    wallet: &WalletCli,
    converter: &ImageConverter,
    client: &FaucetClient,
    operator: &mut O,
) -> Result<String, ClaimError> {
    let allow_list = AllowList::new(settings.extra_allowed_hosts.iter().cloned());
    let claim_url = allow_list.validate(&settings.faucet_url)?;

    let mut captcha_url = settings.captcha_url.clone();
    if settings.faucet_url.to_lowercase() == DEFAULT_GLOBAL_FAUCET {
        check_global_signet(wallet)?;
    } else if captcha_url == DEFAULT_GLOBAL_CAPTCHA {
        // Custom faucets don't get the global captcha unless asked for
        log::info!("Custom faucet, skipping default captcha");
        captcha_url.clear();
    }

    let address = if settings.address.is_empty() {
        let address = wallet.get_new_address(ADDRESS_LABEL, ADDRESS_TYPE)?;
        log::info!("Using new wallet address {}", address);
        address
    } else {
        settings.address.clone()
    };

    let mut request = ClaimRequest {
        address,
        password: settings.password.clone(),
        amount: settings.amount.clone(),
        captcha: None,
    };

    if !captcha_url.is_empty() {
        request.captcha = Some(solve_captcha(&captcha_url, converter, client, operator).await?);
    }

    Ok(client.submit_claim(&claim_url, &request).await?)
}

/// Make sure the wallet is on the chain the global faucet serves.
pub fn check_global_signet(wallet: &WalletCli) -> Result<(), ClaimError> {
    let block_hash = wallet.get_block_hash(1)?;
    if block_hash != GLOBAL_FIRST_BLOCK_HASH {
        return Err(ClaimError::WrongNetwork { block_hash });
    }
    Ok(())
}

/// Fetch the captcha, draw it on the operator's terminal and read the answer.
pub async fn solve_captcha<O: Operator>(
    url: &str,
    converter: &ImageConverter,
    client: &FaucetClient,
    operator: &mut O,
) -> Result<String, ClaimError> {
    let svg = client.fetch_challenge(url).await?;
    let grid = challenge::prepare(&svg, converter)?;

    operator
        .show(&render_to_string(&grid, DEFAULT_THRESHOLD))
        .map_err(ClaimError::Operator)?;
    operator
        .show(&format!("Captcha from URL {}", url))
        .map_err(ClaimError::Operator)?;
    operator.ask("Enter captcha: ").map_err(ClaimError::Operator)
}
