use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[cfg(feature = "oracle-source")]
    #[error("oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("source error: {0}")]
    Source(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("source task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("unknown sync job `{0}`")]
    UnknownJob(String),
}
