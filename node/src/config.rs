//! Node configuration with TOML file support.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use patriot_consensus::{ActiveNode, VoteSigner};
use patriot_store::DEFAULT_FILE_NAME;
use patriot_types::{CollateralRef, LegacySecretKey, NetworkId, OperatorSecretKey, PaymentParams};
use serde::{Deserialize, Serialize};

use crate::logging::{init_logging, LogFormat};
use crate::NodeError;

/// Configuration for the payments service.
///
/// Loaded from a TOML file via [`NodeConfig::from_toml_file`] or built
/// programmatically. Every field has a default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Directory holding the payment votes snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_payments_file")]
    pub payments_file: String,

    /// Protocol constants. Derived from `network`, not read from TOML.
    #[serde(skip)]
    pub params: Option<PaymentParams>,

    /// "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between snapshot writes.
    #[serde(default = "default_dump_interval")]
    pub dump_interval_secs: u64,

    /// Seconds between vote cleanups.
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_secs: u64,

    /// Collect Prometheus metrics for the payments service.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Set when this process operates a patriotnode.
    #[serde(default)]
    pub patriotnode: Option<PatriotnodeConfig>,
}

/// The `[patriotnode]` section. Exactly one of the two keys must be given.
///
/// Keys are read from TOML but never written back, and `Debug` redacts them.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PatriotnodeConfig {
    /// `<txid hex>-<output index>`.
    pub collateral: String,

    /// Hex Ed25519 seed for a legacy-registered node.
    #[serde(default, skip_serializing)]
    pub legacy_key: Option<String>,

    /// Hex BLS scalar for a deterministically registered node.
    #[serde(default, skip_serializing)]
    pub operator_key: Option<String>,
}

impl fmt::Debug for PatriotnodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("PatriotnodeConfig")
            .field("collateral", &self.collateral)
            .field("legacy_key", &redact(&self.legacy_key))
            .field("operator_key", &redact(&self.operator_key))
            .finish()
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Main
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./patriot_data")
}

fn default_payments_file() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dump_interval() -> u64 {
    900
}

fn default_maintenance_interval() -> u64 {
    60
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Explicit parameters if set, otherwise the network's.
    pub fn payment_params(&self) -> PaymentParams {
        self.params
            .clone()
            .unwrap_or_else(|| PaymentParams::for_network(self.network))
    }

    pub fn payments_path(&self) -> PathBuf {
        self.data_dir.join(&self.payments_file)
    }

    pub fn dump_interval(&self) -> Duration {
        Duration::from_secs(self.dump_interval_secs.max(1))
    }

    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_secs(self.maintenance_interval_secs.max(1))
    }

    /// Install the global tracing subscriber from `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<(), NodeError> {
        init_logging(LogFormat::from_config(&self.log_format), &self.log_level)
    }

    /// The operated node, if configured.
    pub fn active_node(&self) -> Result<Option<ActiveNode>, NodeError> {
        self.patriotnode
            .as_ref()
            .map(PatriotnodeConfig::active_node)
            .transpose()
    }
}

impl PatriotnodeConfig {
    pub fn active_node(&self) -> Result<ActiveNode, NodeError> {
        let collateral: CollateralRef = self.collateral.parse()?;
        let signer = match (&self.legacy_key, &self.operator_key) {
            (Some(key), None) => VoteSigner::Legacy(LegacySecretKey::from_hex(key)?),
            (None, Some(key)) => VoteSigner::Operator(OperatorSecretKey::from_hex(key)?),
            (Some(_), Some(_)) => {
                return Err(NodeError::Config(
                    "patriotnode: set legacy_key or operator_key, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(NodeError::Config(
                    "patriotnode: a legacy_key or operator_key is required".to_string(),
                ))
            }
        };
        Ok(ActiveNode { collateral, signer })
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            data_dir: default_data_dir(),
            payments_file: default_payments_file(),
            params: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            dump_interval_secs: default_dump_interval(),
            maintenance_interval_secs: default_maintenance_interval(),
            enable_metrics: false,
            patriotnode: None,
        }
    }
}
