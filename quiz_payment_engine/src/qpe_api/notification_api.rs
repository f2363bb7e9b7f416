use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{PaymentStatusType, TransactionId},
    helpers::SignatureVerifier,
    qpe_api::{
        errors::NotificationError,
        notification_objects::{NotificationReceipt, PaymentNotification, TransactionClass},
    },
    traits::PaymentRecords,
};

/// `NotificationApi` handles payment status notifications from the payment gateway.
///
/// Processing a notification runs through these steps, in order:
/// 1. The fields needed for authentication must be present, otherwise [`NotificationError::MissingFields`].
/// 2. The signature must be valid, otherwise [`NotificationError::InvalidSignature`]. The store is not touched on
///    either of these paths.
/// 3. The transaction status is classified into a [`TransactionClass`].
/// 4. The payment, and for successful payments the quiz result, are updated.
///
/// Only the successful path can fail after authentication: a lookup miss yields
/// [`NotificationError::PaymentNotFound`] and a failed premium upgrade yields
/// [`NotificationError::QuizResultUpdateFailed`]. Everything after the premium upgrade, and every failure on the
/// failed and pending paths, is bookkeeping. Those errors are logged and recorded on the receipt, but the
/// notification is still accepted, so that the gateway does not retry a notification we have substantively handled.
///
/// Notifications are not de-duplicated. A repeated notification re-applies the same transition.
pub struct NotificationApi<B> {
    db: B,
    verifier: SignatureVerifier,
}

impl<B> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B> NotificationApi<B> {
    pub fn new(db: B, verifier: SignatureVerifier) -> Self {
        Self { db, verifier }
    }
}

impl<B> NotificationApi<B>
where B: PaymentRecords
{
    pub async fn process_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<NotificationReceipt, NotificationError> {
        let fields = notification.required_fields().map_err(|e| {
            warn!("🔔️ Rejecting payment notification. {e}");
            e
        })?;
        if !self.verifier.verify(fields.order_id, fields.status_code, fields.gross_amount, fields.signature_key) {
            warn!("🔔️ Invalid signature on notification for order {}. The notification is rejected.", fields.order_id);
            return Err(NotificationError::InvalidSignature);
        }
        let tx_id = TransactionId::from(fields.order_id);
        let class = notification.classify();
        debug!(
            "🔔️ Notification for {tx_id} is authentic. Status: {:?}, fraud status: {:?}, payment type: {:?} => {class}",
            notification.transaction_status, notification.fraud_status, notification.payment_type
        );
        let mut receipt = NotificationReceipt::new(tx_id, class);
        match (class, class.target_status()) {
            (TransactionClass::Successful, _) => self.complete_payment(&mut receipt).await?,
            (_, Some(status)) => self.record_payment_status(&mut receipt, status).await,
            (_, None) => {
                warn!(
                    "🔔️ Unrecognized transaction status {:?} (fraud status {:?}) for {}. The notification is \
                     acknowledged, but nothing was updated.",
                    notification.transaction_status, notification.fraud_status, receipt.order_id
                );
            },
        }
        if receipt.is_clean() {
            info!("🔔️ Notification for {} processed ({class})", receipt.order_id);
        } else {
            warn!(
                "🔔️ Notification for {} processed ({class}) with {} bookkeeping error(s)",
                receipt.order_id,
                receipt.bookkeeping_errors.len()
            );
        }
        Ok(receipt)
    }

    /// Upgrades the quiz result to premium, and then marks the payment as completed.
    async fn complete_payment(&self, receipt: &mut NotificationReceipt) -> Result<(), NotificationError> {
        let tx_id = &receipt.order_id;
        let payment = self.db.find_payment_by_transaction_id(tx_id).await.map_err(|e| {
            if e.is_lookup_miss() {
                warn!("🔔️ Cannot complete payment for {tx_id}. {e}");
                NotificationError::PaymentNotFound(tx_id.clone())
            } else {
                error!("🔔️ Could not fetch payment for {tx_id}. {e}");
                NotificationError::Unexpected(e.to_string())
            }
        })?;
        trace!("🔔️ Payment #{} for {tx_id} unlocks quiz result {}", payment.id, payment.quiz_result_id);
        self.db.update_quiz_result_premium(&payment.quiz_result_id).await.map_err(|e| {
            error!("🔔️ Could not upgrade quiz result {} for {tx_id}. {e}", payment.quiz_result_id);
            NotificationError::QuizResultUpdateFailed {
                quiz_result_id: payment.quiz_result_id.clone(),
                reason: e.to_string(),
            }
        })?;
        info!("🔔️ Quiz result {} for user {} is now premium", payment.quiz_result_id, payment.user_id);
        let completed_at = Utc::now();
        let stamped = self.db.update_payment_status(tx_id, PaymentStatusType::Completed, Some(completed_at)).await;
        if let Err(e) = stamped {
            error!("🔔️ Quiz result was upgraded, but the payment {tx_id} could not be marked as completed. {e}");
            receipt.bookkeeping_errors.push(e);
        }
        Ok(())
    }

    /// Moves the payment into `status`. Failures are recorded on the receipt rather than returned.
    async fn record_payment_status(&self, receipt: &mut NotificationReceipt, status: PaymentStatusType) {
        let tx_id = &receipt.order_id;
        let result = match self.db.find_payment_by_transaction_id(tx_id).await {
            Ok(payment) => {
                trace!("🔔️ Marking payment #{} ({tx_id}) as {status}", payment.id);
                self.db.update_payment_status(tx_id, status, None).await
            },
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            error!("🔔️ Could not mark payment {tx_id} as {status}. {e}");
            receipt.bookkeeping_errors.push(e);
        }
    }
}
