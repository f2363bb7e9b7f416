use std::fmt::Display;

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    db_types::{PaymentStatusType, TransactionId},
    qpe_api::errors::{NotificationError, NotificationOutcome},
    traits::PaymentRecordsError,
};

/// A payment status notification, as posted by the payment gateway.
///
/// Every field is optional on the wire. [`PaymentNotification::required_fields`] checks that the ones needed for
/// processing are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub signature_key: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub status_code: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

/// The gateway sends amounts and status codes as strings, but some integrations post them as bare JSON numbers.
/// Numbers are kept in their JSON text form, since the signature is calculated over the text. This relies on
/// serde_json's `arbitrary_precision` feature; without it `49000.00` would come back as `49000.0`.
pub fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where D: Deserializer<'de> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string or a number, but got {other}"))),
    }
}

/// The fields that must be present before a notification can be authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFields<'a> {
    pub order_id: &'a str,
    pub status_code: &'a str,
    pub gross_amount: &'a str,
    pub signature_key: &'a str,
}

impl PaymentNotification {
    /// Returns the fields needed to verify the notification, or a [`NotificationError::MissingFields`] naming every
    /// field that is absent. Empty strings count as absent.
    pub fn required_fields(&self) -> Result<SignedFields<'_>, NotificationError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }
        let order_id = present(&self.order_id);
        let status_code = present(&self.status_code);
        let gross_amount = present(&self.gross_amount);
        let signature_key = present(&self.signature_key);
        match (order_id, status_code, gross_amount, signature_key) {
            (Some(order_id), Some(status_code), Some(gross_amount), Some(signature_key)) => {
                Ok(SignedFields { order_id, status_code, gross_amount, signature_key })
            },
            _ => {
                let missing = [
                    ("order_id", order_id),
                    ("status_code", status_code),
                    ("gross_amount", gross_amount),
                    ("signature_key", signature_key),
                ]
                .into_iter()
                .filter_map(|(name, v)| v.is_none().then_some(name))
                .collect();
                Err(NotificationError::MissingFields(missing))
            },
        }
    }

    pub fn classify(&self) -> TransactionClass {
        TransactionClass::classify(self.transaction_status.as_deref(), self.fraud_status.as_deref())
    }
}

//--------------------------------------   TransactionClass    ---------------------------------------------------------
/// The bucket a gateway transaction status falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionClass {
    /// `settlement`, or a `capture` that passed the gateway's fraud check.
    Successful,
    /// `cancel`, `deny` or `expire`.
    Failed,
    /// `pending`
    Pending,
    /// Anything else. These notifications are acknowledged and otherwise ignored.
    Unrecognized,
}

impl TransactionClass {
    pub fn classify(transaction_status: Option<&str>, fraud_status: Option<&str>) -> Self {
        match (transaction_status, fraud_status) {
            (Some("settlement"), _) => Self::Successful,
            (Some("capture"), Some("accept")) => Self::Successful,
            (Some("cancel" | "deny" | "expire"), _) => Self::Failed,
            (Some("pending"), _) => Self::Pending,
            _ => Self::Unrecognized,
        }
    }

    /// The payment status this class moves a payment into, if any.
    pub fn target_status(&self) -> Option<PaymentStatusType> {
        match self {
            Self::Successful => Some(PaymentStatusType::Completed),
            Self::Failed => Some(PaymentStatusType::Failed),
            Self::Pending => Some(PaymentStatusType::Pending),
            Self::Unrecognized => None,
        }
    }
}

impl Display for TransactionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Successful => write!(f, "successful"),
            Self::Failed => write!(f, "failed"),
            Self::Pending => write!(f, "pending"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

//--------------------------------------  NotificationReceipt  ---------------------------------------------------------
/// The result of a notification that was accepted.
///
/// Secondary bookkeeping failures do not fail the notification. They are collected in `bookkeeping_errors` so that
/// the caller can log or inspect them.
#[derive(Debug, Clone)]
pub struct NotificationReceipt {
    pub order_id: TransactionId,
    pub class: TransactionClass,
    pub bookkeeping_errors: Vec<PaymentRecordsError>,
}

impl NotificationReceipt {
    pub fn new(order_id: TransactionId, class: TransactionClass) -> Self {
        Self { order_id, class, bookkeeping_errors: vec![] }
    }

    pub fn is_clean(&self) -> bool {
        self.bookkeeping_errors.is_empty()
    }

    /// Accepted notifications always report [`NotificationOutcome::Accepted`], even with bookkeeping errors.
    pub fn outcome(&self) -> NotificationOutcome {
        NotificationOutcome::Accepted
    }
}
