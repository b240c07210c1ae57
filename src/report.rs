use std::io::{self, Write};

use crate::aggregate::PayoutTotals;
use crate::cli::Params;
use crate::config::Config;

/// Renders planck amounts as whole or milli tokens with three decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFormat {
    pub symbol: String,
    pub decimals: u32,
}

impl TokenFormat {
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.token_symbol.clone(), config.token_decimals)
    }

    /// `None` when a whole token does not fit in a `u128`.
    pub fn one_token(&self) -> Option<u128> {
        10u128.checked_pow(self.decimals)
    }

    pub fn format(&self, amount: u128) -> String {
        let decimals = i64::from(self.decimals);
        if self.one_token().map_or(false, |one| amount >= one) {
            let thousandths = to_thousandths(amount, decimals - 3);
            format!("{}{}", three_decimals(thousandths), self.symbol)
        } else {
            let thousandths = to_thousandths(amount, decimals - 6);
            format!("{}m{}", three_decimals(thousandths), self.symbol)
        }
    }
}

/// Divides by `10^exponent`, rounding half up; a negative exponent scales up instead.
fn to_thousandths(amount: u128, exponent: i64) -> u128 {
    let magnitude = u32::try_from(exponent.unsigned_abs()).unwrap_or(u32::MAX);
    let scale = 10u128.checked_pow(magnitude);
    if exponent >= 0 {
        // a unit beyond u128 is more than twice any amount
        scale.map_or(0, |unit| round_div(amount, unit))
    } else {
        match scale {
            Some(factor) => amount.saturating_mul(factor),
            None if amount == 0 => 0,
            None => u128::MAX,
        }
    }
}

impl Default for TokenFormat {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn round_div(amount: u128, unit: u128) -> u128 {
    let (quotient, remainder) = (amount / unit, amount % unit);
    if remainder * 2 >= unit {
        quotient + 1
    } else {
        quotient
    }
}

fn three_decimals(thousandths: u128) -> String {
    format!("{}.{:03}", thousandths / 1000, thousandths % 1000)
}

pub fn write_parameters<W: Write>(out: &mut W, params: &Params) -> io::Result<()> {
    writeln!(out, "Sidecar URL : {}", params.sidecar_url)?;
    writeln!(out, "AccountId : {}", params.account_id)?;
    writeln!(out, "Depth : {}", params.depth)?;
    match params.era {
        Some(era) => writeln!(out, "Era : {}", era)?,
        None => writeln!(out, "Era : unspecified")?,
    }
    writeln!(out, "Unclaimed only : {}", params.unclaimed_only)
}

pub fn write_results<W: Write>(
    out: &mut W,
    account_id: &str,
    params: &Params,
    totals: &PayoutTotals,
    format: &TokenFormat,
) -> io::Result<()> {
    writeln!(
        out,
        "Account {} received {} payouts for {} era(s).",
        account_id, totals.count, params.depth
    )?;
    match (totals.first_era, totals.last_era) {
        (Some(first), Some(last)) if first == last => writeln!(out, "Eras covered: {}", first)?,
        (Some(first), Some(last)) => writeln!(out, "Eras covered: {} to {}", first, last)?,
        _ => {}
    }
    if totals.skipped_eras > 0 {
        writeln!(
            out,
            "{} era(s) returned no payout data.",
            totals.skipped_eras
        )?;
    }

    if params.unclaimed_only {
        writeln!(
            out,
            "Total payout unclaimed is {}",
            format.format(totals.unclaimed)
        )?;
    } else {
        writeln!(out, "Total payout is {}", format.format(totals.total))?;
        writeln!(out, "{} has been claimed.", format.format(totals.claimed))?;
        writeln!(out, "Still {} to claim.", format.format(totals.unclaimed))?;
    }
    Ok(())
}
