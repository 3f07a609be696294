use sqlx::postgres::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::LogEntry;

pub async fn insert_entry<'e, E: PgExecutor<'e>>(db: E, entry: &LogEntry) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO food_log_entries (id, user_id, food_id, amount, meal_tag, logged_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id)
    .bind(entry.user_id)
    .bind(entry.food_id)
    .bind(entry.amount)
    .bind(&entry.meal_tag)
    .bind(entry.logged_at)
    .bind(entry.created_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Non-deleted entries with `start <= logged_at < end`, oldest first.
pub async fn select_range<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> sqlx::Result<Vec<LogEntry>> {
    sqlx::query_as::<_, LogEntry>(
        r#"
        SELECT id, user_id, food_id, amount, meal_tag, logged_at, created_at, deleted_at
        FROM food_log_entries
        WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3 AND deleted_at IS NULL
        ORDER BY logged_at ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn owner_of<'e, E: PgExecutor<'e>>(db: E, id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM food_log_entries WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn soft_delete<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    at: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE food_log_entries SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
        .bind(at)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
