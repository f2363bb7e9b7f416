use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use quiz_payment_engine::{NotificationError, PaymentStatusApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Invalid JSON payload. {0}")]
    CouldNotDeserializePayload(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("{0}")]
    NoRecordFound(String),
    #[error("Failed to update quiz result. {0}")]
    UpdateError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpdateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Server-side details stay in the logs
        let message = match self {
            Self::UpdateError(_) => {
                error!("💻️ {self}");
                "Failed to update quiz result".to_string()
            },
            _ if status.is_server_error() => {
                error!("💻️ {self}");
                "Internal server error".to_string()
            },
            _ => self.to_string(),
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

impl From<NotificationError> for ServerError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::MissingFields(_) => Self::ValidationError(e.to_string()),
            NotificationError::InvalidSignature => Self::InvalidSignature,
            NotificationError::PaymentNotFound(_) => Self::NoRecordFound("Payment not found".into()),
            NotificationError::QuizResultUpdateFailed { .. } => Self::UpdateError(e.to_string()),
            NotificationError::Unexpected(s) => Self::BackendError(s),
        }
    }
}

impl From<PaymentStatusApiError> for ServerError {
    fn from(e: PaymentStatusApiError) -> Self {
        match e {
            PaymentStatusApiError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}
