use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{PaymentStatusType, TransactionId},
    traits::{PaymentStatusView, QuizResultSummary, UserSummary},
};

#[derive(Debug, FromRow)]
struct PaymentStatusRow {
    transaction_id: TransactionId,
    status: PaymentStatusType,
    amount: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    quiz_result_id: Option<String>,
    is_premium: Option<bool>,
    user_id: Option<String>,
    email: Option<String>,
    name: Option<String>,
}

impl From<PaymentStatusRow> for PaymentStatusView {
    fn from(row: PaymentStatusRow) -> Self {
        let quiz_result =
            row.quiz_result_id.map(|id| QuizResultSummary { id, is_premium: row.is_premium.unwrap_or(false) });
        let user = row.user_id.map(|id| UserSummary { id, email: row.email, name: row.name });
        Self {
            order_id: row.transaction_id,
            status: row.status,
            amount: row.amount,
            created_at: row.created_at,
            completed_at: row.completed_at,
            quiz_result,
            user,
        }
    }
}

/// Fetches the latest payment for the transaction id, joined with its quiz result and user.
pub async fn fetch_payment_status(
    tx_id: &TransactionId,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentStatusView>, sqlx::Error> {
    let row: Option<PaymentStatusRow> = sqlx::query_as(
        r#"
            SELECT
                p.transaction_id,
                p.status,
                p.amount,
                p.created_at,
                p.completed_at,
                q.id AS quiz_result_id,
                q.is_premium,
                u.id AS user_id,
                u.email,
                u.name
            FROM payments p
            LEFT JOIN quiz_results q ON q.id = p.quiz_result_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.transaction_id = $1
            ORDER BY p.id DESC
            LIMIT 1
        "#,
    )
    .bind(tx_id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(row.map(PaymentStatusView::from))
}
