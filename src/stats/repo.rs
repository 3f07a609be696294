use sqlx::postgres::PgExecutor;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::Nutrient;

/// One ledger entry joined with its pinned food version's macro definition.
/// The join is by exact version id, so superseded and soft-deleted versions
/// contribute exactly what they said when the entry was logged.
#[derive(Debug, Clone, FromRow)]
pub struct LoggedMacros {
    pub food_id: Uuid,
    pub amount: f64,
    pub measurement_amount: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub async fn select_logged_macros<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> sqlx::Result<Vec<LoggedMacros>> {
    sqlx::query_as::<_, LoggedMacros>(
        r#"
        SELECT l.food_id, l.amount, f.measurement_amount,
               f.calories, f.protein, f.carbs, f.fat
        FROM food_log_entries l
        JOIN foods f ON f.id = l.food_id
        WHERE l.user_id = $1
          AND l.logged_at >= $2
          AND l.logged_at < $3
          AND l.deleted_at IS NULL
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

/// Every nutrient row attached to the given food versions. Duplicate
/// (name, unit) rows within one version come back as-is; summation happens in
/// the fold.
pub async fn select_nutrients_for<'e, E: PgExecutor<'e>>(
    db: E,
    food_ids: &[Uuid],
) -> sqlx::Result<Vec<Nutrient>> {
    sqlx::query_as::<_, Nutrient>(
        r#"
        SELECT food_id, name, amount, unit
        FROM food_nutrients
        WHERE food_id = ANY($1)
        "#,
    )
    .bind(food_ids)
    .fetch_all(db)
    .await
}
