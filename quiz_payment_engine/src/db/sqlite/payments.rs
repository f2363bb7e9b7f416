use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewPayment, Payment, PaymentStatusType, TransactionId};

/// Returns every payment that carries the given transaction id, oldest first. There should only ever be one, but the
/// schema does not enforce it, so the caller decides what to do with zero or many.
pub async fn fetch_payments_by_transaction_id(
    tx_id: &TransactionId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Payment>, sqlx::Error> {
    let payments = sqlx::query_as("SELECT * FROM payments WHERE transaction_id = $1 ORDER BY id")
        .bind(tx_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(payments)
}

/// Sets the status of every payment with the given transaction id and returns the number of rows changed.
///
/// `completed_at` only overwrites the stored completion time when it is `Some`.
pub async fn update_payment_status(
    tx_id: &TransactionId,
    status: PaymentStatusType,
    completed_at: Option<DateTime<Utc>>,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE payments SET
                status = $1,
                completed_at = COALESCE($2, completed_at),
                updated_at = $3
            WHERE transaction_id = $4
        "#,
    )
    .bind(status)
    .bind(completed_at)
    .bind(Utc::now())
    .bind(tx_id.as_str())
    .execute(conn)
    .await?;
    debug!("🗃️ Payment {tx_id} set to {status} ({} rows)", result.rows_affected());
    Ok(result.rows_affected())
}

/// Inserts a new payment in the `pending` state.
///
/// Payments are normally created by the checkout flow upstream of this service. This exists for tooling and tests.
pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, sqlx::Error> {
    let payment = sqlx::query_as(
        r#"
            INSERT INTO payments (
                transaction_id,
                quiz_result_id,
                user_id,
                amount,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(payment.transaction_id)
    .bind(payment.quiz_result_id)
    .bind(payment.user_id)
    .bind(payment.amount)
    .bind(PaymentStatusType::Pending)
    .bind(payment.created_at)
    // Drain the RETURNING rows so the statement completes and the write is committed
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    Ok(payment)
}
