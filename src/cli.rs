use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::config::{normalize_sidecar_url, Config, ConfigError};

pub const DEFAULT_DEPTH: i64 = 5;
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "staking-payouts",
    version,
    about = "Summarize claimed and unclaimed staking payouts reported by a sidecar"
)]
pub struct Cli {
    /// Sidecar base URL, e.g. http://127.0.0.1:8080 (defaults to SIDECAR_URL)
    #[arg(short = 's', long = "sidecar", value_name = "URL")]
    pub sidecar: Option<String>,
    /// Account to query; the author of the latest block is used when empty
    #[arg(
        short = 'a',
        long = "accountId",
        alias = "account-id",
        value_name = "ID"
    )]
    pub account_id: Option<String>,
    /// Number of eras to look back, passed to the sidecar as given
    #[arg(short = 'd', long, default_value_t = DEFAULT_DEPTH, allow_negative_numbers = true)]
    pub depth: i64,
    /// Era to query at; the sidecar picks one when omitted
    #[arg(short = 'e', long, allow_negative_numbers = true)]
    pub era: Option<i64>,
    /// Include claimed payouts in the report
    #[arg(short = 'c', long = "all")]
    pub all: bool,
}

/// Fully resolved run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub sidecar_url: String,
    pub account_id: String,
    pub depth: i64,
    pub era: Option<i64>,
    pub unclaimed_only: bool,
}

impl Params {
    pub fn resolve(cli: Cli, config: &Config) -> Result<Self, ConfigError> {
        let sidecar_url = match cli.sidecar {
            Some(raw) => normalize_sidecar_url(&raw)?,
            None => config.sidecar_url.clone(),
        };
        Ok(Self {
            sidecar_url,
            account_id: cli.account_id.unwrap_or_default(),
            depth: cli.depth,
            era: cli.era,
            unclaimed_only: !cli.all,
        })
    }

    /// `depth=<d>&unclaimedOnly=<b>[&era=<e>]`
    pub fn payouts_query(&self) -> String {
        let mut query = format!(
            "depth={}&unclaimedOnly={}",
            self.depth, self.unclaimed_only
        );
        if let Some(era) = self.era {
            query.push_str(&format!("&era={}", era));
        }
        query
    }
}

pub enum Parsed {
    Run(Params),
    Exit(i32),
}

/// Parses `args` into [`Params`].
///
/// Help and version requests print to stdout and yield exit code 0. Anything malformed
/// prints the usage line to stdout and yields [`USAGE_EXIT_CODE`].
pub fn parse_args<I, T>(args: I, config: &Config) -> Parsed
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return Parsed::Exit(0);
        }
        Err(err) => {
            eprintln!("{}", err);
            print_usage();
            return Parsed::Exit(USAGE_EXIT_CODE);
        }
    };

    match Params::resolve(cli, config) {
        Ok(params) => Parsed::Run(params),
        Err(err) => {
            eprintln!("{}", err);
            print_usage();
            Parsed::Exit(USAGE_EXIT_CODE)
        }
    }
}

fn print_usage() {
    println!("{}", Cli::command().render_usage());
}
