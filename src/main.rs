use clap::Parser;

use getcoins::challenge::ImageConverter;
use getcoins::cli::Args;
use getcoins::config::{Config, Settings, PASSWORD_ENV};
use getcoins::faucet::FaucetClient;
use getcoins::pipeline::{self, ClaimError, Terminal};
use getcoins::wallet::WalletCli;

/// Load `.env` and set up logging.
fn init_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn run(args: Args) -> Result<String, String> {
    let config = Config::load(args.config.as_deref()).map_err(|e| e.to_string())?;
    let settings = Settings::resolve(&args, &config, std::env::var(PASSWORD_ENV).ok());
    log::debug!("Resolved settings: faucet={} captcha={:?}", settings.faucet_url, settings.captcha_url);

    let wallet = WalletCli::new(settings.wallet_command.clone(), settings.wallet_args.clone());
    let converter = ImageConverter::new(settings.converter.clone());
    let client = FaucetClient::new().map_err(|e| e.to_string())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async {
        let mut terminal = Terminal::stdio();
        pipeline::run(&settings, &wallet, &converter, &client, &mut terminal)
            .await
            .map_err(|e: ClaimError| e.to_string())
    })
}

fn main() {
    init_env();

    let args = Args::parse();

    match run(args) {
        Ok(body) => println!("{}", body),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
