use chrono::{DateTime, Utc};
use mockall::mock;
use quiz_payment_engine::{
    db_types::{Payment, PaymentStatusType, TransactionId},
    traits::{
        PaymentRecords,
        PaymentRecordsError,
        PaymentStatusQueries,
        PaymentStatusQueryError,
        PaymentStatusView,
    },
};

mock! {
    pub PaymentRecorder {}
    impl PaymentRecords for PaymentRecorder {
        async fn find_payment_by_transaction_id(&self, tx_id: &TransactionId) -> Result<Payment, PaymentRecordsError>;
        async fn update_quiz_result_premium(&self, quiz_result_id: &str) -> Result<(), PaymentRecordsError>;
        async fn update_payment_status(&self, tx_id: &TransactionId, status: PaymentStatusType, completed_at: Option<DateTime<Utc>>) -> Result<(), PaymentRecordsError>;
    }
}

mock! {
    pub StatusReporter {}
    impl PaymentStatusQueries for StatusReporter {
        async fn fetch_payment_status(&self, tx_id: &TransactionId) -> Result<Option<PaymentStatusView>, PaymentStatusQueryError>;
    }
}
