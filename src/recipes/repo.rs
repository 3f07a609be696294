use sqlx::postgres::PgExecutor;
use uuid::Uuid;

use crate::model::Ingredient;

pub async fn insert_item<'e, E: PgExecutor<'e>>(
    db: E,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    amount: f64,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO recipe_items (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)")
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(amount)
        .execute(db)
        .await?;
    Ok(())
}

/// Ingredient rows joined with each pinned food version's name.
pub async fn fetch_items<'e, E: PgExecutor<'e>>(
    db: E,
    recipe_id: Uuid,
) -> sqlx::Result<Vec<Ingredient>> {
    sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT f.id AS id, f.name AS name, ri.amount AS amount
        FROM recipe_items ri
        JOIN foods f ON f.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY f.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
}
