use thiserror::Error;

use crate::{db_types::TransactionId, traits::PaymentStatusView};

#[derive(Debug, Clone, Error)]
pub enum PaymentStatusQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentStatusQueryError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStatusQueryError::DatabaseError(e.to_string())
    }
}

/// Read-only queries that report on the state of a payment. Nothing in here mutates the store.
#[allow(async_fn_in_trait)]
pub trait PaymentStatusQueries {
    /// Fetches the payment for the given transaction id, joined with its quiz result and user. If no payment exists,
    /// `None` is returned. If the quiz result or the user record is missing, the corresponding summary is `None`.
    async fn fetch_payment_status(
        &self,
        tx_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, PaymentStatusQueryError>;
}
