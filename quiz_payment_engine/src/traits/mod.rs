//! # Storage collaborator contracts
//!
//! Payments and quiz results are owned by an external relational store. This module defines the behaviour a storage
//! backend has to expose so that the engine can read and transition those records.
//!
//! * [`PaymentRecords`] covers the lookups and updates made while processing a gateway notification.
//! * [`PaymentStatusQueries`] provides the read-only views used to report on a payment.
//!
//! [`crate::SqliteDatabase`] implements both.
mod data_objects;
mod payment_records;
mod payment_status_queries;

pub use data_objects::{PaymentStatusView, QuizResultSummary, UserSummary};
pub use payment_records::{PaymentRecords, PaymentRecordsError};
pub use payment_status_queries::{PaymentStatusQueries, PaymentStatusQueryError};
