use std::io::Write;
use std::process;

use anyhow::Context;

use staking_payouts::cli::{self, Parsed};
use staking_payouts::config::Config;
use staking_payouts::report::TokenFormat;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    let params = match cli::parse_args(std::env::args_os(), &config) {
        Parsed::Run(params) => params,
        Parsed::Exit(code) => process::exit(code),
    };
    let format = TokenFormat::from_config(&config);

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = staking_payouts::run(&params, &format, &mut stdout).await {
        let code = err.exit_code();
        tracing::debug!(code, "staking payouts run failed");
        let _ = writeln!(stdout, "{}", err);
        drop(stdout);
        process::exit(code);
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
