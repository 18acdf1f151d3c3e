//! HTTP client for the settlement signer gateway.
//!
//! The gateway holds the authority keypair and turns each call into a
//! signed contract transaction. This client only speaks JSON to it.

use async_trait::async_trait;
use reqwest::StatusCode;
use seek_types::{SettlementAccount, SettlementTx};
use serde::Deserialize;
use std::time::Duration;

use crate::contract::SettlementContract;
use crate::error::SettlementError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpSettlementContract {
    http_client: reqwest::Client,
    endpoint: String,
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    tx: String,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

impl HttpSettlementContract {
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
        }
    }

    async fn call(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<SettlementTx, SettlementError> {
        let url = format!("{}/{path}", self.endpoint.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SettlementError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: TxResponse = response
                .json()
                .await
                .map_err(|e| SettlementError::Transport(format!("response body: {e}")))?;
            return Ok(SettlementTx::new(parsed.tx));
        }

        // The gateway reports a still-open challenge window as a conflict.
        let gateway_error: Option<GatewayError> = response.json().await.ok();
        if status == StatusCode::CONFLICT
            || gateway_error
                .as_ref()
                .and_then(|e| e.code.as_deref())
                .is_some_and(|c| c == "challenge_period_active")
        {
            return Err(SettlementError::ChallengePeriodActive);
        }

        let detail = gateway_error
            .map(|e| e.error)
            .unwrap_or_else(|| format!("HTTP {status}"));
        if status.is_client_error() {
            Err(SettlementError::Rejected(detail))
        } else {
            Err(SettlementError::Transport(detail))
        }
    }
}

#[async_trait]
impl SettlementContract for HttpSettlementContract {
    async fn reveal_mission(
        &self,
        account: &SettlementAccount,
        secret_a: [u8; 32],
        secret_b: [u8; 32],
    ) -> Result<SettlementTx, SettlementError> {
        self.call(
            "reveal",
            serde_json::json!({
                "account": account.as_str(),
                "secret_a": hex::encode(secret_a),
                "secret_b": hex::encode(secret_b),
            }),
        )
        .await
    }

    async fn propose_resolution(
        &self,
        account: &SettlementAccount,
        success: bool,
    ) -> Result<SettlementTx, SettlementError> {
        self.call(
            "propose",
            serde_json::json!({
                "account": account.as_str(),
                "success": success,
            }),
        )
        .await
    }

    async fn finalize_bounty(
        &self,
        account: &SettlementAccount,
    ) -> Result<SettlementTx, SettlementError> {
        self.call(
            "finalize",
            serde_json::json!({
                "account": account.as_str(),
            }),
        )
        .await
    }
}
