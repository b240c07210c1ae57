use crate::models::{EraPayouts, Payout, StakingPayouts};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutTotals {
    pub total: u128,
    pub count: u64,
    pub claimed: u128,
    pub unclaimed: u128,
    pub first_era: Option<u32>,
    pub last_era: Option<u32>,
    pub skipped_eras: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    #[error("invalid payout amount {amount:?} in era {era}")]
    InvalidAmount { amount: String, era: EraLabel },
    #[error("payout total overflowed while adding {amount} in era {era}")]
    Overflow { amount: u128, era: EraLabel },
}

/// Era index for error messages; the sidecar may omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraLabel(pub Option<u32>);

impl std::fmt::Display for EraLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(era) => write!(f, "{}", era),
            None => f.write_str("<unknown>"),
        }
    }
}

impl PayoutTotals {
    fn add(&mut self, payout: &Payout, era: Option<u32>) -> Result<(), AggregateError> {
        let amount: u128 = payout
            .nominator_staking_payout
            .trim()
            .parse()
            .map_err(|_| AggregateError::InvalidAmount {
                amount: payout.nominator_staking_payout.clone(),
                era: EraLabel(era),
            })?;
        let overflow = || AggregateError::Overflow {
            amount,
            era: EraLabel(era),
        };

        self.total = self.total.checked_add(amount).ok_or_else(overflow)?;
        if payout.claimed {
            self.claimed = self.claimed.checked_add(amount).ok_or_else(overflow)?;
        } else {
            self.unclaimed = self.unclaimed.checked_add(amount).ok_or_else(overflow)?;
        }
        self.count += 1;
        Ok(())
    }

    fn observe_era(&mut self, era: u32) {
        self.first_era = Some(self.first_era.map_or(era, |first| first.min(era)));
        self.last_era = Some(self.last_era.map_or(era, |last| last.max(era)));
    }
}

/// Sums every payout of every era group into claimed and unclaimed totals.
///
/// Groups the sidecar reports as a message carry no payouts and are skipped.
pub fn aggregate(payouts: &StakingPayouts) -> Result<PayoutTotals, AggregateError> {
    let mut totals = PayoutTotals::default();

    for group in &payouts.eras_payouts {
        match group {
            EraPayouts::Payouts(data) => {
                if let Some(era) = data.era {
                    totals.observe_era(era);
                }
                for payout in &data.payouts {
                    totals.add(payout, data.era)?;
                }
            }
            EraPayouts::Message { message } => {
                tracing::warn!("skipping era without payouts: {}", message);
                totals.skipped_eras += 1;
            }
        }
    }

    tracing::debug!(
        count = totals.count,
        skipped = totals.skipped_eras,
        "aggregated staking payouts"
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EraPayoutsData;

    fn payout(amount: &str, claimed: bool) -> Payout {
        Payout {
            nominator_staking_payout: amount.to_string(),
            claimed,
        }
    }

    fn era(era: u32, payouts: Vec<Payout>) -> EraPayouts {
        EraPayouts::Payouts(EraPayoutsData {
            era: Some(era),
            payouts,
        })
    }

    #[test]
    fn empty_response_sums_to_zero() {
        let totals = aggregate(&StakingPayouts {
            eras_payouts: vec![],
        })
        .unwrap();
        assert_eq!(totals, PayoutTotals::default());
    }

    #[test]
    fn splits_claimed_and_unclaimed() {
        let payouts = StakingPayouts {
            eras_payouts: vec![
                era(
                    10,
                    vec![payout("1500000000000", true), payout("250000000000", false)],
                ),
                era(12, vec![payout("7", false)]),
                era(11, vec![]),
            ],
        };

        let totals = aggregate(&payouts).unwrap();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.claimed, 1_500_000_000_000);
        assert_eq!(totals.unclaimed, 250_000_000_007);
        assert_eq!(totals.total, totals.claimed + totals.unclaimed);
        assert_eq!(totals.first_era, Some(10));
        assert_eq!(totals.last_era, Some(12));
    }

    #[test]
    fn totals_always_balance() {
        let amounts = [0u128, 1, 999, 123_456_789_012_345, 10u128.pow(24)];
        let mut groups = Vec::new();
        for (i, chunk) in amounts.chunks(2).enumerate() {
            let records = chunk
                .iter()
                .enumerate()
                .map(|(j, a)| payout(&a.to_string(), (i + j) % 2 == 0))
                .collect();
            groups.push(era(i as u32, records));
        }

        let totals = aggregate(&StakingPayouts {
            eras_payouts: groups,
        })
        .unwrap();
        assert_eq!(totals.count, amounts.len() as u64);
        assert_eq!(totals.total, amounts.iter().sum::<u128>());
        assert_eq!(totals.total, totals.claimed + totals.unclaimed);
    }

    #[test]
    fn handles_amounts_beyond_u64() {
        let big = "50000000000000000000000"; // > u64::MAX
        let totals = aggregate(&StakingPayouts {
            eras_payouts: vec![era(1, vec![payout(big, false), payout(big, false)])],
        })
        .unwrap();
        assert_eq!(totals.unclaimed, 100_000_000_000_000_000_000_000);
    }

    #[test]
    fn message_groups_are_skipped() {
        let totals = aggregate(&StakingPayouts {
            eras_payouts: vec![
                EraPayouts::Message {
                    message: "era not found".to_string(),
                },
                era(3, vec![payout("5", true)]),
            ],
        })
        .unwrap();
        assert_eq!(totals.skipped_eras, 1);
        assert_eq!(totals.count, 1);
        assert_eq!(totals.first_era, Some(3));
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let err = aggregate(&StakingPayouts {
            eras_payouts: vec![era(9, vec![payout("12.5", true)])],
        })
        .unwrap_err();
        assert!(matches!(err, AggregateError::InvalidAmount { .. }));
        assert_eq!(
            err.to_string(),
            "invalid payout amount \"12.5\" in era 9"
        );
    }

    #[test]
    fn reports_overflow_instead_of_wrapping() {
        let max = u128::MAX.to_string();
        let err = aggregate(&StakingPayouts {
            eras_payouts: vec![era(1, vec![payout(&max, true), payout("1", true)])],
        })
        .unwrap_err();
        assert!(matches!(err, AggregateError::Overflow { amount: 1, .. }));
    }
}
