//! SEEK daemon: entry point for running a SEEK bounty node.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use seek_identity::HttpCredentialLedger;
use seek_node::{NodeConfig, SeekNode};
use seek_rpc::RpcServer;
use seek_settlement::HttpSettlementContract;
use seek_verification::HttpVisionProvider;

#[derive(Parser)]
#[command(name = "seek-daemon", about = "SEEK protocol bounty node daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RPC server port.
    #[arg(long, env = "SEEK_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Disable the RPC server.
    #[arg(long, env = "SEEK_DISABLE_RPC")]
    no_rpc: bool,

    /// Vision adjudication endpoint.
    #[arg(long, env = "SEEK_VISION_ENDPOINT")]
    vision_endpoint: Option<String>,

    /// Vision API key.
    #[arg(long, env = "SEEK_VISION_API_KEY")]
    vision_api_key: Option<String>,

    /// Settlement signer gateway endpoint.
    #[arg(long, env = "SEEK_SETTLEMENT_ENDPOINT")]
    settlement_endpoint: Option<String>,

    /// Bearer token for the settlement gateway.
    #[arg(long, env = "SEEK_SETTLEMENT_TOKEN")]
    settlement_auth_token: Option<String>,

    /// Credential ledger endpoint.
    #[arg(long, env = "SEEK_LEDGER_ENDPOINT")]
    credential_ledger_endpoint: Option<String>,

    /// Disable anti-fraud pre-checks (dev networks only).
    #[arg(long, env = "SEEK_BYPASS_PRECHECKS")]
    bypass_prechecks: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "SEEK_LOG_LEVEL")]
    log_level: String,
}

fn load_config(cli: &Cli) -> NodeConfig {
    let file_config: Option<NodeConfig> = cli.config.as_ref().and_then(|path| {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<NodeConfig>(&contents) {
                Ok(cfg) => {
                    tracing::info!("loaded config from {}", path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("failed to parse config file: {e}, using CLI defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "failed to read config file {}: {e}, using CLI defaults",
                    path.display()
                );
                None
            }
        }
    });

    let base = file_config.unwrap_or_default();
    NodeConfig {
        enable_rpc: !cli.no_rpc && base.enable_rpc,
        rpc_port: cli.rpc_port.unwrap_or(base.rpc_port),
        vision_endpoint: cli
            .vision_endpoint
            .clone()
            .unwrap_or(base.vision_endpoint),
        vision_api_key: cli
            .vision_api_key
            .clone()
            .unwrap_or(base.vision_api_key),
        settlement_endpoint: cli
            .settlement_endpoint
            .clone()
            .unwrap_or(base.settlement_endpoint),
        settlement_auth_token: cli
            .settlement_auth_token
            .clone()
            .unwrap_or(base.settlement_auth_token),
        credential_ledger_endpoint: cli
            .credential_ledger_endpoint
            .clone()
            .unwrap_or(base.credential_ledger_endpoint),
        bypass_prechecks: cli.bypass_prechecks || base.bypass_prechecks,
        log_level: cli.log_level.clone(),
        ..base
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    seek_utils::init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli);

    tracing::info!(
        rpc = if config.enable_rpc {
            config.rpc_port.to_string()
        } else {
            "off".into()
        },
        vision = %config.vision_endpoint,
        settlement = %config.settlement_endpoint,
        "starting SEEK bounty node"
    );

    let contract = Arc::new(HttpSettlementContract::new(
        config.settlement_endpoint.clone(),
        config.settlement_auth_token.clone(),
    ));
    let provider = Arc::new(HttpVisionProvider::new(
        config.vision_endpoint.clone(),
        config.vision_api_key.clone(),
        config.vision_model.clone(),
    ));
    let ledger = Arc::new(HttpCredentialLedger::new(
        config.credential_ledger_endpoint.clone(),
    ));

    let node = Arc::new(SeekNode::new(config, contract, provider, ledger));
    node.start();

    if node.config.enable_rpc {
        let server = RpcServer::new(node.clone(), node.config.rpc_port);
        let node_for_rpc = node.clone();
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                tracing::error!("rpc server failed: {e}");
                node_for_rpc.shutdown.shutdown();
            }
        });
    }

    node.shutdown.wait_for_signal().await;

    tracing::info!("shutdown signal received, stopping node");
    node.stop().await;

    tracing::info!("seek daemon exited cleanly");
    Ok(())
}
