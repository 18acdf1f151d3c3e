//! RPC error type and its HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use seek_identity::IdentityError;
use seek_node::NodeError;
use seek_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("gone: {0}")]
    Gone(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RpcError::Forbidden(_) => StatusCode::FORBIDDEN,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Conflict(_) => StatusCode::CONFLICT,
            RpcError::Gone(_) => StatusCode::GONE,
            RpcError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<NodeError> for RpcError {
    fn from(e: NodeError) -> Self {
        match e {
            NodeError::Store(StoreError::ActiveBountyExists { .. }) => {
                RpcError::Conflict(e.to_string())
            }
            NodeError::Store(StoreError::BountyNotFound(_))
            | NodeError::Store(StoreError::MissionNotFound(_)) => {
                RpcError::NotFound(e.to_string())
            }
            NodeError::Store(StoreError::InvalidTransition { .. }) => {
                RpcError::Conflict(e.to_string())
            }
            NodeError::Store(StoreError::SecretMissing(_)) => RpcError::Server(e.to_string()),
            NodeError::BountyExpired(_) => RpcError::Gone(e.to_string()),
            NodeError::NoMissionForTier(_) => RpcError::InvalidRequest(e.to_string()),
            NodeError::Verification(_) => RpcError::InvalidRequest(e.to_string()),
            NodeError::Settlement(_) => RpcError::Upstream(e.to_string()),
            NodeError::Identity(inner) => inner.into(),
            NodeError::Config(_) => RpcError::Server(e.to_string()),
        }
    }
}

impl From<IdentityError> for RpcError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::NoChallengeIssued
            | IdentityError::NonceExpired
            | IdentityError::MessageMismatch
            | IdentityError::InvalidSignature => RpcError::Unauthorized(e.to_string()),
            IdentityError::NoCredential => RpcError::Forbidden(e.to_string()),
            IdentityError::CredentialBoundElsewhere => RpcError::Conflict(e.to_string()),
            IdentityError::Ledger(_) => RpcError::Upstream(e.to_string()),
            IdentityError::Malformed(_) => RpcError::InvalidRequest(e.to_string()),
        }
    }
}
