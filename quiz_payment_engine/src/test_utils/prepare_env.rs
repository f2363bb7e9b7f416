use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{db_types::NewPayment, SqliteDatabase};

/// Creates a fresh database at `url`, runs the migrations and returns a handle to it.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

/// A unique SQLite URL in the system temp directory.
pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/qpg_test_store_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("Could not drop database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// Seeds a user, a (non-premium) quiz result and a pending payment that links them.
pub async fn seed_pending_payment(db: &SqliteDatabase, tx_id: &str, quiz_result_id: &str, user_id: &str) {
    if db.fetch_user(user_id).await.expect("Error fetching user").is_none() {
        db.insert_user(user_id, Some(&format!("{user_id}@example.com")), Some("Test User"))
            .await
            .expect("Error inserting user");
    }
    if db.fetch_quiz_result(quiz_result_id).await.expect("Error fetching quiz result").is_none() {
        db.insert_quiz_result(quiz_result_id, user_id).await.expect("Error inserting quiz result");
    }
    let payment = NewPayment::new(tx_id, quiz_result_id, user_id).with_amount("49000.00");
    db.insert_payment(payment).await.expect("Error inserting payment");
}
