use std::fmt::Display;

use thiserror::Error;

use crate::{db_types::TransactionId, traits::PaymentStatusQueryError};

/// Errors that stop a notification from being accepted.
///
/// Failures in secondary bookkeeping are deliberately absent. They are recorded on the
/// [`crate::NotificationReceipt`] instead.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Payment not found for transaction {0}")]
    PaymentNotFound(TransactionId),
    #[error("Failed to update quiz result {quiz_result_id}. {reason}")]
    QuizResultUpdateFailed { quiz_result_id: String, reason: String },
    #[error("Unexpected error while processing the notification. {0}")]
    Unexpected(String),
}

/// The coarse outcome of processing a notification. This is all the payment gateway ever gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Accepted,
    BadRequest,
    InvalidSignature,
    NotFound,
    UpdateFailed,
    InternalError,
}

impl NotificationError {
    pub fn outcome(&self) -> NotificationOutcome {
        match self {
            Self::MissingFields(_) => NotificationOutcome::BadRequest,
            Self::InvalidSignature => NotificationOutcome::InvalidSignature,
            Self::PaymentNotFound(_) => NotificationOutcome::NotFound,
            Self::QuizResultUpdateFailed { .. } => NotificationOutcome::UpdateFailed,
            Self::Unexpected(_) => NotificationOutcome::InternalError,
        }
    }
}

impl Display for NotificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Accepted => "accepted",
            Self::BadRequest => "bad_request",
            Self::InvalidSignature => "invalid_signature",
            Self::NotFound => "not_found",
            Self::UpdateFailed => "update_failed",
            Self::InternalError => "internal_error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentStatusApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PaymentStatusQueryError> for PaymentStatusApiError {
    fn from(e: PaymentStatusQueryError) -> Self {
        match e {
            PaymentStatusQueryError::DatabaseError(s) => Self::DatabaseError(s),
        }
    }
}
