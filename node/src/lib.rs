//! Patriotnode payments node.
//!
//! Hosts the payment-quorum voting engine inside a node:
//! - Loads and periodically writes the vote snapshot
//! - Routes payment messages from peers into vote sync
//! - Casts this node's own vote on every new tip
//! - Exposes the block payee hooks to the block validator
//! - Trims expired votes on a timer

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod service;
pub mod shutdown;

pub use config::{NodeConfig, PatriotnodeConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::PaymentMetrics;
pub use service::PaymentsService;
pub use shutdown::ShutdownController;
