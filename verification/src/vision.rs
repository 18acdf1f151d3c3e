//! Vision adjudication provider boundary.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

use crate::error::VerificationError;

/// Default timeout for vision requests. Adjudication sits in the photo
/// submission request path, so this bounds user-facing latency.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Boundary trait for the vision model call.
///
/// Implementations return the model's raw free-text reply; parsing and
/// schema validation live in the adjudicator.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn analyze(
        &self,
        image: &[u8],
        mime: &str,
        prompt: &str,
    ) -> Result<String, VerificationError>;
}

/// HTTP-backed vision provider.
///
/// The API contract: `POST {endpoint}` with
/// `{"model": ..., "prompt": ..., "image": {"mime": ..., "data": base64}}`
/// returns `{"content": "..."}`.
pub struct HttpVisionProvider {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

/// Raw JSON response from the vision endpoint.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    content: String,
}

impl HttpVisionProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl VisionProvider for HttpVisionProvider {
    async fn analyze(
        &self,
        image: &[u8],
        mime: &str,
        prompt: &str,
    ) -> Result<String, VerificationError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "image": {
                "mime": mime,
                "data": base64::engine::general_purpose::STANDARD.encode(image),
            },
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerificationError::ProviderUnreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    VerificationError::ProviderUnreachable(format!("connection failed: {e}"))
                } else {
                    VerificationError::ProviderUnreachable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(VerificationError::ProviderUnreachable(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| VerificationError::VerdictParse(format!("response body: {e}")))?;
        Ok(parsed.content)
    }
}
