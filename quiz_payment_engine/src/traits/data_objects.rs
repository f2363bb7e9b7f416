use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{PaymentStatusType, TransactionId};

/// A payment, together with the quiz result it unlocks and the user that owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusView {
    pub order_id: TransactionId,
    pub status: PaymentStatusType,
    pub amount: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub quiz_result: Option<QuizResultSummary>,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResultSummary {
    pub id: String,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}
