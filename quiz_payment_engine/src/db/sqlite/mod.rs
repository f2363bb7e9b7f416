//! # SQLite backend
//!
//! The submodules hold the "low-level" SQLite interactions. They are simple functions (rather than stateful structs)
//! that accept a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or open a
//! transaction, and call through to the functions without any other changes.
//!
//! [`SqliteDatabase`] wraps a connection pool and implements the engine's storage traits on top of these functions.
use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod payment_status;
pub mod payments;
pub mod quiz_results;
mod sqlite_impl;
pub mod users;

pub use sqlite_impl::SqliteDatabase;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    info!("🗃️ Connected to database with a pool of up to {max_connections} connections");
    Ok(pool)
}
