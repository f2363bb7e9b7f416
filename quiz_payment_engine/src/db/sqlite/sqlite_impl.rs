//! `SqliteDatabase` is a concrete implementation of a quiz payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::{new_pool, payment_status, payments, quiz_results, users};
use crate::{
    db_types::{NewPayment, Payment, PaymentStatusType, QuizResult, TransactionId, User},
    traits::{
        PaymentRecords,
        PaymentRecordsError,
        PaymentStatusQueries,
        PaymentStatusQueryError,
        PaymentStatusView,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl PaymentRecords for SqliteDatabase {
    async fn find_payment_by_transaction_id(&self, tx_id: &TransactionId) -> Result<Payment, PaymentRecordsError> {
        let mut conn = self.pool.acquire().await?;
        let mut found = payments::fetch_payments_by_transaction_id(tx_id, &mut conn).await?;
        match found.len() {
            0 => Err(PaymentRecordsError::PaymentNotFound(tx_id.clone())),
            1 => Ok(found.remove(0)),
            n => {
                warn!("🗃️ {n} payments share the transaction id {tx_id}. This should never happen.");
                Err(PaymentRecordsError::AmbiguousPayment(tx_id.clone(), n))
            },
        }
    }

    async fn update_quiz_result_premium(&self, quiz_result_id: &str) -> Result<(), PaymentRecordsError> {
        let mut conn = self.pool.acquire().await?;
        match quiz_results::set_premium(quiz_result_id, &mut conn).await? {
            0 => Err(PaymentRecordsError::QuizResultNotFound(quiz_result_id.to_string())),
            _ => Ok(()),
        }
    }

    async fn update_payment_status(
        &self,
        tx_id: &TransactionId,
        status: PaymentStatusType,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), PaymentRecordsError> {
        let mut conn = self.pool.acquire().await?;
        match payments::update_payment_status(tx_id, status, completed_at, &mut conn).await? {
            0 => Err(PaymentRecordsError::PaymentNotFound(tx_id.clone())),
            _ => Ok(()),
        }
    }
}

impl PaymentStatusQueries for SqliteDatabase {
    async fn fetch_payment_status(
        &self,
        tx_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, PaymentStatusQueryError> {
        let mut conn = self.pool.acquire().await?;
        let status = payment_status::fetch_payment_status(tx_id, &mut conn).await?;
        Ok(status)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Brings the schema up to date with the migrations shipped in this crate.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    pub async fn insert_user(
        &self,
        user_id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user_id, email, name, &mut conn).await
    }

    pub async fn insert_quiz_result(&self, quiz_result_id: &str, user_id: &str) -> Result<QuizResult, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        quiz_results::insert_quiz_result(quiz_result_id, user_id, &mut conn).await
    }

    pub async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::insert_payment(payment, &mut conn).await?;
        debug!("🗃️ Payment {} inserted with id {}", payment.transaction_id, payment.id);
        Ok(payment)
    }

    pub async fn fetch_quiz_result(&self, quiz_result_id: &str) -> Result<Option<QuizResult>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        quiz_results::fetch_quiz_result(quiz_result_id, &mut conn).await
    }

    pub async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user(user_id, &mut conn).await
    }
}
