//! Axum-based RPC server.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use seek_node::{SeekNode, StatusReport};
use seek_types::{BountyId, Tier, Timestamp, WalletAddress};

use crate::error::RpcError;
use crate::handlers::{
    BountyView, IdentityStatusResponse, NonceRequest, NonceResponse, StartBountyRequest,
    StartBountyResponse, SubmitPhotoRequest, SubmitPhotoResponse, VerifyRequest, VerifyResponse,
};

pub struct RpcServer {
    node: Arc<SeekNode>,
    port: u16,
}

impl RpcServer {
    pub fn new(node: Arc<SeekNode>, port: u16) -> Self {
        Self { node, port }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/nonce", post(issue_nonce))
            .route("/verify", post(verify_identity))
            .route("/status/:wallet", get(identity_status))
            .route("/bounty/start", post(start_bounty))
            .route("/bounty/:id/submit", post(submit_photo))
            .route("/bounty/:id", get(get_bounty))
            .route("/ops/status", get(ops_status))
            .layer(CorsLayer::permissive())
            .with_state(self.node.clone())
    }

    /// Bind and serve until the node broadcasts shutdown.
    pub async fn serve(&self) -> Result<(), RpcError> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        tracing::info!(%addr, "rpc server listening");

        let mut shutdown_rx = self.node.shutdown.subscribe();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

fn parse_wallet(raw: &str) -> Result<WalletAddress, RpcError> {
    WalletAddress::parse(raw)
        .ok_or_else(|| RpcError::InvalidRequest(format!("malformed wallet address: {raw}")))
}

fn parse_bounty_id(raw: &str) -> Result<BountyId, RpcError> {
    BountyId::parse_hex(raw)
        .ok_or_else(|| RpcError::InvalidRequest(format!("malformed bounty id: {raw}")))
}

// ── Identity ─────────────────────────────────────────────────────────────

async fn issue_nonce(
    State(node): State<Arc<SeekNode>>,
    Json(req): Json<NonceRequest>,
) -> Result<Json<NonceResponse>, RpcError> {
    let wallet = parse_wallet(&req.wallet_address)?;
    let challenge = node.identity.issue_challenge(&wallet, Timestamp::now());
    Ok(Json(NonceResponse {
        nonce: challenge.nonce,
        message: challenge.message,
        ttl_secs: node.config.params.nonce_ttl_secs,
    }))
}

async fn verify_identity(
    State(node): State<Arc<SeekNode>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let wallet = parse_wallet(&req.wallet_address)?;
    let verification = node
        .identity
        .verify(&wallet, &req.message, &req.signature, Timestamp::now())
        .await?;
    Ok(Json(VerifyResponse {
        verified: verification.verified,
        bound_token_id: verification.token_id.map(|t| t.to_string()),
        verified_at: verification.verified_at.map(|t| t.as_secs()),
    }))
}

async fn identity_status(
    State(node): State<Arc<SeekNode>>,
    Path(wallet): Path<String>,
) -> Result<Json<IdentityStatusResponse>, RpcError> {
    let wallet = parse_wallet(&wallet)?;
    let status = node.identity.status(&wallet);
    Ok(Json(IdentityStatusResponse {
        wallet_address: status.wallet.to_string(),
        verified: status.verified,
        bound_token_id: status.token_id.map(|t| t.to_string()),
        verified_at: status.verified_at.map(|t| t.as_secs()),
    }))
}

// ── Bounty ───────────────────────────────────────────────────────────────

async fn start_bounty(
    State(node): State<Arc<SeekNode>>,
    Json(req): Json<StartBountyRequest>,
) -> Result<Json<StartBountyResponse>, RpcError> {
    let wallet = parse_wallet(&req.wallet)?;
    let tier = Tier::from_u8(req.tier)
        .ok_or_else(|| RpcError::InvalidRequest(format!("unknown tier: {}", req.tier)))?;

    let started = node
        .service
        .start_bounty(wallet, tier, Timestamp::now())?;
    Ok(Json(StartBountyResponse {
        bounty_id: started.bounty.id.to_string(),
        tier: started.bounty.tier.as_u8(),
        stake: started.bounty.stake,
        expires_at: started.bounty.expires_at.as_secs(),
        settlement_account: started.bounty.settlement_account.to_string(),
        commitment: started.commitment,
        attestation_nonce: started.attestation_nonce,
    }))
}

async fn submit_photo(
    State(node): State<Arc<SeekNode>>,
    Path(id): Path<String>,
    Json(req): Json<SubmitPhotoRequest>,
) -> Result<Json<SubmitPhotoResponse>, RpcError> {
    let bounty_id = parse_bounty_id(&id)?;
    let photo = base64::engine::general_purpose::STANDARD
        .decode(&req.photo)
        .map_err(|e| RpcError::InvalidRequest(format!("photo is not valid base64: {e}")))?;

    let outcome = node
        .service
        .submit_photo(
            &bounty_id,
            &photo,
            &req.mime,
            req.metadata,
            req.attestation,
            Timestamp::now(),
        )
        .await?;
    Ok(Json(SubmitPhotoResponse {
        bounty_id: outcome.bounty.id.to_string(),
        status: format!("{:?}", outcome.bounty.status).to_lowercase(),
        is_valid: outcome.verdict.is_valid,
        confidence: outcome.verdict.confidence,
        reasoning: outcome.verdict.reasoning,
        detected_objects: outcome.verdict.detected_objects,
        challenge_end: outcome.challenge_end.as_secs(),
        payout_state: "pending".to_string(),
        payout_on_win: outcome.payout_on_win,
    }))
}

async fn get_bounty(
    State(node): State<Arc<SeekNode>>,
    Path(id): Path<String>,
) -> Result<Json<BountyView>, RpcError> {
    let bounty_id = parse_bounty_id(&id)?;
    let bounty = node
        .service
        .get_bounty(&bounty_id)
        .ok_or_else(|| RpcError::NotFound(format!("bounty {bounty_id} not found")))?;
    Ok(Json(BountyView::from_bounty(&bounty)))
}

// ── Operations ───────────────────────────────────────────────────────────

async fn ops_status(State(node): State<Arc<SeekNode>>) -> Json<StatusReport> {
    Json(node.status())
}
