//! Read-only reporting on payments.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::TransactionId,
    qpe_api::errors::PaymentStatusApiError,
    traits::{PaymentStatusQueries, PaymentStatusView},
};

/// The `PaymentStatusApi` reports on the current state of payments.
pub struct PaymentStatusApi<B> {
    db: B,
}

impl<B: Debug> Debug for PaymentStatusApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentStatusApi ({:?})", self.db)
    }
}

impl<B> PaymentStatusApi<B>
where B: PaymentStatusQueries
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the payment for the given order id, along with its quiz result and user. Returns `None` if there is no
    /// such payment.
    pub async fn payment_status(
        &self,
        order_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, PaymentStatusApiError> {
        trace!("🔍️ Fetching payment status for {order_id}");
        let status = self.db.fetch_payment_status(order_id).await?;
        Ok(status)
    }
}
