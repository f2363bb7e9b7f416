//! Quiz Payment Engine
//!
//! The engine handles the payment status notifications that the payment gateway posts after a customer pays for a
//! premium quiz result. It authenticates each notification, classifies the transaction status, and moves the payment
//! and quiz result records along accordingly.
//!
//! The library is divided into three main sections:
//! 1. Storage ([`traits`] and the SQLite backend). The records live in an external relational store. The traits
//!    define what the engine needs from that store, and [`SqliteDatabase`] implements them.
//! 2. The engine public API ([`NotificationApi`] and [`PaymentStatusApi`]). These are generic over the storage traits,
//!    so they can be exercised with any backend, including mocks.
//! 3. [`helpers`], which holds the gateway signature scheme.
mod db;

pub mod db_types;
pub mod helpers;
mod qpe_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use qpe_api::{
    errors::{NotificationError, NotificationOutcome, PaymentStatusApiError},
    notification_api::NotificationApi,
    notification_objects::{NotificationReceipt, PaymentNotification, SignedFields, TransactionClass},
    payment_status_api::PaymentStatusApi,
};
