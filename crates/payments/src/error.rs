use database::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor could not be reached or rejected the call; retryable
    #[error("payment processor error: {0}")]
    Gateway(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Gateway(err.to_string())
    }
}
