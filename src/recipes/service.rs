use std::collections::BTreeMap;

use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::repo as catalog_repo;
use crate::error::{Error, Result};
use crate::model::{FoodKind, Ingredient};
use crate::recipes::repo;

/// Writes a recipe version's ingredient list inside the caller's transaction.
/// Every entry is validated up front: a malformed id fails the whole call
/// rather than being dropped, an unknown id is not-found, and ingredients
/// must be plain foods (recipes do not nest).
pub(crate) async fn insert_ingredients(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    entries: &BTreeMap<String, f64>,
) -> Result<Vec<Ingredient>> {
    let mut ingredients = Vec::with_capacity(entries.len());
    for (raw_id, amount) in entries {
        let ingredient_id = Uuid::parse_str(raw_id)
            .map_err(|_| Error::validation(format!("malformed ingredient id {raw_id:?}")))?;
        let food = catalog_repo::fetch_version(&mut **tx, ingredient_id)
            .await?
            .ok_or(Error::NotFound("ingredient"))?;
        if food.kind != FoodKind::Food {
            return Err(Error::validation(format!(
                "ingredient {:?} is a recipe; recipes may only reference foods",
                food.name
            )));
        }
        repo::insert_item(&mut **tx, recipe_id, ingredient_id, *amount).await?;
        ingredients.push(Ingredient {
            id: ingredient_id,
            name: food.name,
            amount: *amount,
        });
    }
    Ok(ingredients)
}

/// Adds ingredients to an existing recipe version, atomically.
#[instrument(skip(db, entries))]
pub async fn set_ingredients(
    db: &PgPool,
    recipe_version_id: Uuid,
    entries: &BTreeMap<String, f64>,
) -> Result<Vec<Ingredient>> {
    let recipe = catalog_repo::fetch_version(db, recipe_version_id)
        .await?
        .ok_or(Error::NotFound("recipe"))?;
    if recipe.kind != FoodKind::Recipe {
        return Err(Error::validation("record is not a recipe"));
    }

    let mut tx = db.begin().await?;
    let ingredients = insert_ingredients(&mut tx, recipe_version_id, entries).await?;
    tx.commit().await?;
    Ok(ingredients)
}

pub(crate) async fn fetch_ingredients<'e, E: PgExecutor<'e>>(
    db: E,
    recipe_id: Uuid,
) -> sqlx::Result<Vec<Ingredient>> {
    repo::fetch_items(db, recipe_id).await
}

/// Ingredient list of a recipe version, names resolved from the pinned
/// versions. No recursive expansion; ingredients are always plain foods.
#[instrument(skip(db))]
pub async fn get_ingredients(db: &PgPool, recipe_version_id: Uuid) -> Result<Vec<Ingredient>> {
    let recipe = catalog_repo::fetch_version(db, recipe_version_id)
        .await?
        .ok_or(Error::NotFound("recipe"))?;
    if recipe.kind != FoodKind::Recipe {
        return Err(Error::validation("record is not a recipe"));
    }
    Ok(repo::fetch_items(db, recipe_version_id).await?)
}
