use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid key or identifier: {0}")]
    Types(#[from] patriot_types::TypesError),

    #[error("consensus error: {0}")]
    Consensus(#[from] patriot_consensus::ConsensusError),

    #[error("network error: {0}")]
    Network(#[from] patriot_network::NetworkError),

    #[error("store error: {0}")]
    Store(#[from] patriot_store::StoreError),

    #[error("load error: {0}")]
    Load(#[from] patriot_store::LoadError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("logging already initialised: {0}")]
    Logging(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
