use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a service operation
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The named resource does not exist or is not visible to the caller
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    /// Progress, notes and Q&A require an enrollment in the course
    #[error("not enrolled in this course")]
    NotEnrolled,

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<models::money::MoneyError> for ServiceError {
    fn from(err: models::money::MoneyError) -> Self {
        Self::Validation(err.to_string())
    }
}
