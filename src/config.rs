use std::env;

use url::Url;

pub const DEFAULT_SIDECAR_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TOKEN_SYMBOL: &str = "KSM";
pub const DEFAULT_TOKEN_DECIMALS: u32 = 12;

const MIN_TOKEN_DECIMALS: u32 = 6;
const MAX_TOKEN_DECIMALS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sidecar_url: String,
    pub token_symbol: String,
    pub token_decimals: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid sidecar url {url:?}: {source}")]
    InvalidSidecarUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("sidecar url {0:?} must use http or https")]
    UnsupportedScheme(String),
    #[error("TOKEN_DECIMALS must be an integer, got {0:?}")]
    InvalidDecimals(String),
    #[error("TOKEN_DECIMALS must be between 6 and 30, got {0}")]
    DecimalsOutOfRange(u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sidecar_url: DEFAULT_SIDECAR_URL.to_string(),
            token_symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            token_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sidecar_url = lookup("SIDECAR_URL")
            .map(|raw| normalize_sidecar_url(&raw))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_SIDECAR_URL.to_string());
        let token_symbol = lookup("TOKEN_SYMBOL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string());
        let token_decimals = lookup("TOKEN_DECIMALS")
            .map(|raw| parse_decimals(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_TOKEN_DECIMALS);

        Ok(Self {
            sidecar_url,
            token_symbol,
            token_decimals,
        })
    }
}

/// Checks that `raw` is an absolute http(s) url and strips any trailing slash.
pub fn normalize_sidecar_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidSidecarUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_decimals(raw: &str) -> Result<u32, ConfigError> {
    let decimals: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDecimals(raw.to_string()))?;
    if !(MIN_TOKEN_DECIMALS..=MAX_TOKEN_DECIMALS).contains(&decimals) {
        return Err(ConfigError::DecimalsOutOfRange(decimals));
    }
    Ok(decimals)
}
