use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::QuizResult;

/// Sets the premium flag on a quiz result and returns the number of rows changed. The flag is only ever set, never
/// cleared.
pub async fn set_premium(quiz_result_id: &str, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE quiz_results SET is_premium = 1, updated_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(quiz_result_id)
        .execute(conn)
        .await?;
    debug!("🗃️ Quiz result {quiz_result_id} set to premium ({} rows)", result.rows_affected());
    Ok(result.rows_affected())
}

pub async fn fetch_quiz_result(
    quiz_result_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<QuizResult>, sqlx::Error> {
    let result =
        sqlx::query_as("SELECT * FROM quiz_results WHERE id = $1").bind(quiz_result_id).fetch_optional(conn).await?;
    Ok(result)
}

/// Quiz results are written by the quiz application. This exists for tooling and tests.
pub async fn insert_quiz_result(
    quiz_result_id: &str,
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<QuizResult, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query_as(
        r#"
            INSERT INTO quiz_results (id, user_id, is_premium, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $3)
            RETURNING *;
        "#,
    )
    .bind(quiz_result_id)
    .bind(user_id)
    .bind(now)
    // Drain the RETURNING rows so the statement completes and the write is committed
    .fetch_all(conn)
    .await?
    .pop()
    .ok_or(sqlx::Error::RowNotFound)?;
    Ok(result)
}
