use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db_types::User;

pub async fn fetch_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

/// Users are owned by the quiz application. This exists for tooling and tests.
pub async fn insert_user(
    user_id: &str,
    email: Option<&str>,
    name: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as(
        r#"
            INSERT INTO users (id, email, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(name)
    .bind(Utc::now())
    // Drain the RETURNING rows so the statement completes and the write is committed
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    Ok(user)
}
