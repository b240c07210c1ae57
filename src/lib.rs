pub mod aggregate;
pub mod cli;
pub mod config;
pub mod models;
pub mod report;
pub mod sidecar;

use std::io::{self, Write};

use crate::aggregate::{aggregate, AggregateError, PayoutTotals};
use crate::cli::Params;
use crate::report::TokenFormat;
use crate::sidecar::{SidecarClient, SidecarError};

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
    #[error("failed to aggregate staking payouts: {0}")]
    Aggregate(#[from] AggregateError),
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Sidecar(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Prints parameters, resolves the account, fetches payouts and writes the summary to `out`.
pub async fn run<W: Write>(
    params: &Params,
    format: &TokenFormat,
    out: &mut W,
) -> Result<PayoutTotals, RunError> {
    report::write_parameters(out, params)?;

    let client = SidecarClient::new(&params.sidecar_url)?;
    if params.account_id.is_empty() {
        writeln!(out, "Using last block author.")?;
    }
    let account_id = client.resolve_account(&params.account_id).await?;

    let payouts = client.staking_payouts(&account_id, params).await?;
    let totals = aggregate(&payouts)?;

    report::write_results(out, &account_id, params, &totals, format)?;
    Ok(totals)
}
