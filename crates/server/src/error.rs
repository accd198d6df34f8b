use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::ServiceError;
use log::error;
use payments::PaymentError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::dtos::MessageResponse;

/// Every failure a handler can return, mapped onto an HTTP status
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The processor reports the order as not (yet) paid
    #[error("{0}")]
    PaymentRequired(String),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::Service(ServiceError::Database(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) | Self::Payment(PaymentError::Service(err)) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotEnrolled => StatusCode::FORBIDDEN,
                ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Payment(PaymentError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Payment(PaymentError::Gateway(_)) => StatusCode::BAD_GATEWAY,
            Self::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
