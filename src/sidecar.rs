use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::cli::Params;
use crate::models::{BlockHead, StakingPayouts};

#[derive(thiserror::Error, Debug)]
pub enum SidecarError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("sidecar request {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Sidecar request {url} returns {}. Exiting.", .status.as_u16())]
    UnexpectedStatus { url: String, status: StatusCode },
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SidecarError {
    /// Process exit code: the HTTP status for upstream failures, 1 otherwise.
    ///
    /// Unix keeps only the low byte of an exit code, so statuses such as 512 that would
    /// read as success are reported as 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SidecarError::UnexpectedStatus { status, .. } => {
                let code = i32::from(status.as_u16());
                if code % 256 == 0 {
                    1
                } else {
                    code
                }
            }
            _ => 1,
        }
    }
}

pub struct SidecarClient {
    base_url: String,
    http: reqwest::Client,
}

impl SidecarClient {
    pub fn new(base_url: &str) -> Result<Self, SidecarError> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(SidecarError::Client)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn payouts_url(&self, account_id: &str, params: &Params) -> String {
        format!(
            "{}/accounts/{}/staking-payouts?{}",
            self.base_url,
            account_id,
            params.payouts_query()
        )
    }

    pub async fn last_block_author(&self) -> Result<String, SidecarError> {
        let head: BlockHead = self.get_json(format!("{}/blocks/head", self.base_url)).await?;
        Ok(head.author_id)
    }

    /// Returns `account_id` unchanged, or the latest block author when it is empty.
    pub async fn resolve_account(&self, account_id: &str) -> Result<String, SidecarError> {
        if !account_id.is_empty() {
            return Ok(account_id.to_string());
        }
        let author = self.last_block_author().await?;
        tracing::info!("resolved account from last block author: {}", author);
        Ok(author)
    }

    pub async fn staking_payouts(
        &self,
        account_id: &str,
        params: &Params,
    ) -> Result<StakingPayouts, SidecarError> {
        self.get_json(self.payouts_url(account_id, params)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SidecarError> {
        tracing::debug!("GET {}", url);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(SidecarError::Transport { url, source }),
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("sidecar responded {} for {}", status, url);
            return Err(SidecarError::UnexpectedStatus { url, status });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => return Err(SidecarError::Transport { url, source }),
        };
        serde_json::from_str(&body).map_err(|source| SidecarError::Decode { url, source })
    }
}
