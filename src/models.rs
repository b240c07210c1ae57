use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// `GET /blocks/head`, reduced to the one field we use.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHead {
    pub author_id: String,
}

/// `GET /accounts/{accountId}/staking-payouts`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPayouts {
    pub eras_payouts: Vec<EraPayouts>,
}

/// The sidecar reports an era either with its payouts or with a message explaining
/// why they could not be computed.
#[derive(Debug, Clone)]
pub enum EraPayouts {
    Payouts(EraPayoutsData),
    Message { message: String },
}

#[derive(Deserialize)]
struct EraMessage {
    message: String,
}

// Dispatch on the `payouts` key so field errors inside a record keep their message.
impl<'de> Deserialize<'de> for EraPayouts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let Some(group) = value.as_object() else {
            return Err(D::Error::custom(format!(
                "era group must be an object, got {}",
                value
            )));
        };

        if group.contains_key("payouts") {
            EraPayoutsData::deserialize(value)
                .map(EraPayouts::Payouts)
                .map_err(|err| D::Error::custom(format!("invalid era payouts: {}", err)))
        } else if group.contains_key("message") {
            EraMessage::deserialize(value)
                .map(|m| EraPayouts::Message { message: m.message })
                .map_err(|err| D::Error::custom(format!("invalid era message: {}", err)))
        } else {
            Err(D::Error::custom(
                "era group has neither `payouts` nor `message`",
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraPayoutsData {
    #[serde(default)]
    pub era: Option<u32>,
    pub payouts: Vec<Payout>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    /// Planck-denominated amount, encoded as a decimal string.
    pub nominator_staking_payout: String,
    pub claimed: bool,
}
