use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------    TransactionId      ---------------------------------------------------------
/// The transaction identifier for a payment. The payment gateway calls this the `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl FromStr for TransactionId {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------  PaymentStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatusType {
    /// The payment has been created, or the gateway reports that it is still waiting for the customer.
    Pending,
    /// The gateway has settled the payment and the quiz result has been upgraded.
    Completed,
    /// The payment was cancelled, denied or expired.
    Failed,
}

impl Display for PaymentStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatusType::Pending => write!(f, "pending"),
            PaymentStatusType::Completed => write!(f, "completed"),
            PaymentStatusType::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for PaymentStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to pending");
            PaymentStatusType::Pending
        })
    }
}

//--------------------------------------        Payment        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: i64,
    pub transaction_id: TransactionId,
    pub quiz_result_id: String,
    pub user_id: String,
    /// The amount as the upstream checkout recorded it. This system never interprets it.
    pub amount: Option<String>,
    pub status: PaymentStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

//--------------------------------------       NewPayment      ---------------------------------------------------------
/// Payments are created upstream, when the customer starts a checkout. This type exists so that the records can be
/// seeded in tests and tooling.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub transaction_id: TransactionId,
    pub quiz_result_id: String,
    pub user_id: String,
    pub amount: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewPayment {
    pub fn new<T: Into<TransactionId>>(transaction_id: T, quiz_result_id: &str, user_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            quiz_result_id: quiz_result_id.to_string(),
            user_id: user_id.to_string(),
            amount: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_amount<S: Into<String>>(mut self, amount: S) -> Self {
        self.amount = Some(amount.into());
        self
    }
}

//--------------------------------------       QuizResult      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub user_id: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------          User         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}
