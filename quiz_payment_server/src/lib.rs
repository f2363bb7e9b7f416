//! # Quiz payment gateway server
//! This crate hosts the HTTP server for the quiz payment gateway. It is responsible for:
//! Receiving payment status notifications from the payment gateway.
//! Handing them to the [`quiz_payment_engine::NotificationApi`] and translating the result into an HTTP response.
//! Reporting the current state of a payment to the rest of the quiz platform.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns static service metadata.
//! * `/payment-notification`: The webhook route for receiving payment status notifications from the gateway.
//! * `/payment-status/{order_id}`: Returns the payment for the given order, along with its quiz result and user.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;
