//! HTTP client for the external credential ledger.

use async_trait::async_trait;
use seek_types::WalletAddress;
use serde::Deserialize;
use std::time::Duration;

use crate::error::IdentityError;
use crate::registry::{CredentialLedger, CredentialTokenId};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpCredentialLedger {
    http_client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct CredentialResponse {
    token_id: Option<String>,
}

impl HttpCredentialLedger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CredentialLedger for HttpCredentialLedger {
    async fn credential_for(
        &self,
        wallet: &WalletAddress,
    ) -> Result<Option<CredentialTokenId>, IdentityError> {
        let url = format!(
            "{}/credential/{}",
            self.endpoint.trim_end_matches('/'),
            wallet
        );
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| IdentityError::Ledger(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(IdentityError::Ledger(format!(
                "ledger returned HTTP {}",
                response.status()
            )));
        }

        let parsed: CredentialResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Ledger(format!("response body: {e}")))?;
        Ok(parsed.token_id.map(CredentialTokenId::new))
    }
}
