use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("storage: {0}")]
    Storage(#[from] lastseen_api::SourceError),

    #[error("metrics recorder: {0}")]
    Metrics(String),

    #[error("listen {addr}: {source}")]
    Listen { addr: SocketAddr, source: std::io::Error },

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),
}
