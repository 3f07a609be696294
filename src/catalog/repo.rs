use sqlx::postgres::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::dto::NutrientDraft;
use crate::model::{Food, Nutrient};

/// Fetch by exact version id, ignoring current/deleted flags. Historical log
/// joins depend on superseded and soft-deleted rows staying reachable here.
pub async fn fetch_version<'e, E: PgExecutor<'e>>(db: E, id: Uuid) -> sqlx::Result<Option<Food>> {
    sqlx::query_as::<_, Food>(
        r#"
        SELECT id, creator_id, family_id, version, is_current, name,
               calories, protein, carbs, fat, kind,
               measurement_unit, measurement_amount, public, created_at, deleted_at
        FROM foods
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_nutrients<'e, E: PgExecutor<'e>>(
    db: E,
    food_id: Uuid,
) -> sqlx::Result<Vec<Nutrient>> {
    sqlx::query_as::<_, Nutrient>(
        r#"
        SELECT food_id, name, amount, unit
        FROM food_nutrients
        WHERE food_id = $1
        "#,
    )
    .bind(food_id)
    .fetch_all(db)
    .await
}

pub async fn list_visible<'e, E: PgExecutor<'e>>(db: E, user_id: Uuid) -> sqlx::Result<Vec<Food>> {
    sqlx::query_as::<_, Food>(
        r#"
        SELECT id, creator_id, family_id, version, is_current, name,
               calories, protein, carbs, fat, kind,
               measurement_unit, measurement_amount, public, created_at, deleted_at
        FROM foods
        WHERE (creator_id = $1 OR public = true)
          AND is_current = true
          AND deleted_at IS NULL
        ORDER BY kind, name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn resolve_family<'e, E: PgExecutor<'e>>(db: E, id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("SELECT family_id FROM foods WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Deletion cascades over whole families, so the `deleted_at` filter is
/// all-or-nothing per family: a live family lists every version, a deleted
/// one lists nothing.
pub async fn list_versions<'e, E: PgExecutor<'e>>(
    db: E,
    family_id: Uuid,
) -> sqlx::Result<Vec<Food>> {
    sqlx::query_as::<_, Food>(
        r#"
        SELECT id, creator_id, family_id, version, is_current, name,
               calories, protein, carbs, fat, kind,
               measurement_unit, measurement_amount, public, created_at, deleted_at
        FROM foods
        WHERE family_id = $1 AND deleted_at IS NULL
        ORDER BY version DESC
        "#,
    )
    .bind(family_id)
    .fetch_all(db)
    .await
}

/// Serializes concurrent version creation on one family for the rest of the
/// transaction. Released automatically at commit/rollback.
pub async fn lock_family<'e, E: PgExecutor<'e>>(db: E, family_id: Uuid) -> sqlx::Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(family_id.to_string())
        .execute(db)
        .await?;
    Ok(())
}

pub async fn max_version<'e, E: PgExecutor<'e>>(db: E, family_id: Uuid) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>("SELECT COALESCE(MAX(version), 0) FROM foods WHERE family_id = $1")
        .bind(family_id)
        .fetch_one(db)
        .await
}

pub async fn clear_current<'e, E: PgExecutor<'e>>(db: E, family_id: Uuid) -> sqlx::Result<()> {
    sqlx::query("UPDATE foods SET is_current = false WHERE family_id = $1 AND is_current = true")
        .bind(family_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn insert_food<'e, E: PgExecutor<'e>>(db: E, food: &Food) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO foods (
            id, creator_id, family_id, version, is_current, name,
            calories, protein, carbs, fat, kind,
            measurement_unit, measurement_amount, public, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(food.id)
    .bind(food.creator_id)
    .bind(food.family_id)
    .bind(food.version)
    .bind(food.is_current)
    .bind(&food.name)
    .bind(food.calories)
    .bind(food.protein)
    .bind(food.carbs)
    .bind(food.fat)
    .bind(food.kind)
    .bind(&food.measurement_unit)
    .bind(food.measurement_amount)
    .bind(food.public)
    .bind(food.created_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn insert_nutrient<'e, E: PgExecutor<'e>>(
    db: E,
    food_id: Uuid,
    nutrient: &NutrientDraft,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO food_nutrients (food_id, name, amount, unit) VALUES ($1, $2, $3, $4)")
        .bind(food_id)
        .bind(&nutrient.name)
        .bind(nutrient.amount)
        .bind(&nutrient.unit)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn soft_delete_family<'e, E: PgExecutor<'e>>(
    db: E,
    family_id: Uuid,
    at: OffsetDateTime,
) -> sqlx::Result<u64> {
    let result =
        sqlx::query("UPDATE foods SET deleted_at = $1 WHERE family_id = $2 AND deleted_at IS NULL")
            .bind(at)
            .bind(family_id)
            .execute(db)
            .await?;
    Ok(result.rows_affected())
}
