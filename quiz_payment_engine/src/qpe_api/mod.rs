//! # Quiz payment engine public API
//!
//! * [`notification_api`] authenticates gateway notifications and applies the resulting payment and quiz result
//!   transitions.
//! * [`payment_status_api`] reports on the current state of a payment.
//!
//! The pattern for using the APIs is the same. An API instance is created by supplying a storage backend that
//! implements the backend traits the API requires:
//!
//! ```rust,ignore
//! use qpg_common::Secret;
//! use quiz_payment_engine::{helpers::SignatureVerifier, NotificationApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let verifier = SignatureVerifier::new(Secret::new(server_key));
//! let api = NotificationApi::new(db, verifier);
//! let receipt = api.process_notification(notification).await?;
//! ```
pub mod errors;
pub mod notification_api;
pub mod notification_objects;
pub mod payment_status_api;
