use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{Payment, PaymentStatusType, TransactionId};

#[derive(Debug, Clone, Error)]
pub enum PaymentRecordsError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("The requested payment does not exist for transaction {0}")]
    PaymentNotFound(TransactionId),
    #[error("Transaction {0} matches {1} payments, but exactly one was expected")]
    AmbiguousPayment(TransactionId, usize),
    #[error("The requested quiz result {0} does not exist")]
    QuizResultNotFound(String),
}

impl From<sqlx::Error> for PaymentRecordsError {
    fn from(e: sqlx::Error) -> Self {
        PaymentRecordsError::DatabaseError(e.to_string())
    }
}

impl PaymentRecordsError {
    /// True if the error means that the transaction id did not resolve to exactly one payment.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::PaymentNotFound(_) | Self::AmbiguousPayment(..))
    }
}

/// The lookups and state transitions the notification processor needs from the store.
///
/// Every call is a round trip to an external service and may fail. Callers await each call before making the next;
/// nothing here is expected to be transactional across calls.
#[allow(async_fn_in_trait)]
pub trait PaymentRecords {
    /// Fetches the payment with the given transaction id.
    ///
    /// The lookup must resolve to exactly one record. No match is reported as
    /// [`PaymentRecordsError::PaymentNotFound`], and more than one as [`PaymentRecordsError::AmbiguousPayment`].
    async fn find_payment_by_transaction_id(&self, tx_id: &TransactionId) -> Result<Payment, PaymentRecordsError>;

    /// Sets the premium flag on the quiz result to true. The flag is never cleared.
    ///
    /// Returns [`PaymentRecordsError::QuizResultNotFound`] if there is no such quiz result.
    async fn update_quiz_result_premium(&self, quiz_result_id: &str) -> Result<(), PaymentRecordsError>;

    /// Sets the status of the payment with the given transaction id.
    ///
    /// If `completed_at` is `None`, the stored completion time is left as it is.
    /// Returns [`PaymentRecordsError::PaymentNotFound`] if no payment was updated.
    async fn update_payment_status(
        &self,
        tx_id: &TransactionId,
        status: PaymentStatusType,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), PaymentRecordsError>;
}
