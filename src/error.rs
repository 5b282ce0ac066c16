use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("probe query `{query}` failed: {reason}")]
    Probe { query: &'static str, reason: String },

    #[error("probe task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MetricsError {
    pub fn probe(query: &'static str, reason: impl Into<String>) -> Self {
        Self::Probe {
            query,
            reason: reason.into(),
        }
    }
}

pub type MetricsResult<T> = Result<T, MetricsError>;
