//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};

use seek_types::ProtocolParams;

use crate::NodeError;

/// Configuration for a SEEK bounty node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Protocol parameters (contract constants plus pipeline tuning; not
    /// read from TOML config).
    #[serde(skip)]
    pub params: ProtocolParams,

    /// Whether to enable the RPC server.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// RPC port (if enabled).
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Vision adjudication endpoint.
    #[serde(default = "default_vision_endpoint")]
    pub vision_endpoint: String,

    /// Vision model identifier.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Vision API key. Usually supplied via the environment, not the file.
    #[serde(default)]
    pub vision_api_key: String,

    /// Settlement signer gateway endpoint.
    #[serde(default = "default_settlement_endpoint")]
    pub settlement_endpoint: String,

    /// Bearer token for the settlement gateway.
    #[serde(default)]
    pub settlement_auth_token: String,

    /// Credential ledger endpoint for identity verification.
    #[serde(default = "default_ledger_endpoint")]
    pub credential_ledger_endpoint: String,

    /// Disable anti-fraud pre-checks. Dev networks only; the pipeline
    /// construction wires this into the pre-checker at startup.
    #[serde(default)]
    pub bypass_prechecks: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_rpc_port() -> u16 {
    8090
}

fn default_vision_endpoint() -> String {
    "https://vision.seekprotocol.io/v1/analyze".to_string()
}

fn default_vision_model() -> String {
    "seek-vision-1".to_string()
}

fn default_settlement_endpoint() -> String {
    "http://127.0.0.1:8900".to_string()
}

fn default_ledger_endpoint() -> String {
    "http://127.0.0.1:8901".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            params: ProtocolParams::default(),
            enable_rpc: default_true(),
            rpc_port: default_rpc_port(),
            vision_endpoint: default_vision_endpoint(),
            vision_model: default_vision_model(),
            vision_api_key: String::new(),
            settlement_endpoint: default_settlement_endpoint(),
            settlement_auth_token: String::new(),
            credential_ledger_endpoint: default_ledger_endpoint(),
            bypass_prechecks: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.rpc_port, config.rpc_port);
        assert_eq!(parsed.vision_model, config.vision_model);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 8090);
        assert!(config.enable_rpc);
        assert!(!config.bypass_prechecks);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            bypass_prechecks = true
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert!(config.bypass_prechecks);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/seek.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), NodeError::Config(_)));
    }
}
