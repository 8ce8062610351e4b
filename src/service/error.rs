use axum::http::StatusCode;
use thiserror::Error;

use crate::{api::error::ApiError, error::HttpError, models::deliverymodel::DeliveryStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Delivery {delivery_id} cannot move from {from:?} to {to:?}")]
    InvalidDeliveryTransition {
        delivery_id: String,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("Request for {0} was superseded by a newer one")]
    Superseded(String),

    #[error(transparent)]
    Upstream(#[from] ApiError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidDeliveryTransition { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Superseded(_) => StatusCode::CONFLICT,
            ServiceError::Upstream(err) => err.status_code(),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Upstream(err) => err.into(),
            superseded @ ServiceError::Superseded(_) => HttpError::conflict(superseded.to_string()),
            other => HttpError::bad_request(other.to_string()),
        }
    }
}
