use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::dto::RecordDraft;
use crate::catalog::repo;
use crate::error::{Error, Result};
use crate::model::{Food, FoodKind, Nutrient};
use crate::recipes;

fn hydrate_nutrients(food_id: Uuid, draft: &RecordDraft) -> Vec<Nutrient> {
    draft
        .nutrients
        .iter()
        .map(|n| Nutrient {
            food_id,
            name: n.name.clone(),
            amount: n.amount,
            unit: n.unit.clone(),
        })
        .collect()
}

/// Creates version 1 of a brand-new family. The version row, its nutrients
/// and (for recipes) its ingredient list commit atomically.
#[instrument(skip(db, draft), fields(name = %draft.name))]
pub async fn create_record(db: &PgPool, creator_id: Uuid, draft: RecordDraft) -> Result<Food> {
    draft.validate(draft.kind)?;

    let id = Uuid::now_v7();
    let mut food = Food {
        id,
        creator_id,
        family_id: id,
        version: 1,
        is_current: true,
        name: draft.name.clone(),
        calories: draft.calories,
        protein: draft.protein,
        carbs: draft.carbs,
        fat: draft.fat,
        kind: draft.kind,
        measurement_unit: draft.measurement_unit.clone(),
        measurement_amount: draft.measurement_amount,
        public: draft.public,
        created_at: OffsetDateTime::now_utc(),
        deleted_at: None,
        nutrients: Vec::new(),
        ingredients: Vec::new(),
    };

    let mut tx = db.begin().await?;
    repo::insert_food(&mut *tx, &food).await?;
    for n in &draft.nutrients {
        repo::insert_nutrient(&mut *tx, id, n).await?;
    }
    if food.kind == FoodKind::Recipe {
        food.ingredients = recipes::insert_ingredients(&mut tx, id, &draft.ingredients).await?;
    }
    tx.commit().await?;

    food.nutrients = hydrate_nutrients(id, &draft);
    info!(record = %food.id, family = %food.family_id, "created record");
    Ok(food)
}

/// Supersedes the family resolved from `version_id` with a new version. The
/// read-max / flip-current / insert sequence runs under a per-family advisory
/// lock so concurrent updates cannot mint the same version number or leave
/// two rows current; the schema's unique indexes back this up and surface as
/// a conflict if ever hit.
#[instrument(skip(db, draft), fields(version_id = %version_id))]
pub async fn update_record(db: &PgPool, version_id: Uuid, draft: RecordDraft) -> Result<Food> {
    let existing = repo::fetch_version(db, version_id)
        .await?
        .filter(|f| f.deleted_at.is_none())
        .ok_or(Error::NotFound("record"))?;

    // Kind, family and creator carry over from the family, never the draft.
    draft.validate(existing.kind)?;

    let mut tx = db.begin().await?;
    repo::lock_family(&mut *tx, existing.family_id).await?;

    let next_version = repo::max_version(&mut *tx, existing.family_id).await? + 1;
    repo::clear_current(&mut *tx, existing.family_id).await?;

    let id = Uuid::now_v7();
    let mut food = Food {
        id,
        creator_id: existing.creator_id,
        family_id: existing.family_id,
        version: next_version,
        is_current: true,
        name: draft.name.clone(),
        calories: draft.calories,
        protein: draft.protein,
        carbs: draft.carbs,
        fat: draft.fat,
        kind: existing.kind,
        measurement_unit: draft.measurement_unit.clone(),
        measurement_amount: draft.measurement_amount,
        public: draft.public,
        created_at: OffsetDateTime::now_utc(),
        deleted_at: None,
        nutrients: Vec::new(),
        ingredients: Vec::new(),
    };

    repo::insert_food(&mut *tx, &food)
        .await
        .map_err(|e| Error::on_unique(e, "concurrent update to the same record"))?;
    for n in &draft.nutrients {
        repo::insert_nutrient(&mut *tx, id, n).await?;
    }
    if food.kind == FoodKind::Recipe {
        food.ingredients = recipes::insert_ingredients(&mut tx, id, &draft.ingredients).await?;
    }
    tx.commit().await?;

    food.nutrients = hydrate_nutrients(id, &draft);
    info!(record = %food.id, family = %food.family_id, version = food.version, "superseded record");
    Ok(food)
}

/// Fetch by exact version id, nutrients and (for recipes) ingredients
/// included. Superseded and soft-deleted versions stay reachable here so the
/// ledger and aggregator can always hydrate pinned history.
#[instrument(skip(db))]
pub async fn get_record(db: &PgPool, version_id: Uuid) -> Result<Food> {
    let mut food = repo::fetch_version(db, version_id)
        .await?
        .ok_or(Error::NotFound("record"))?;
    food.nutrients = repo::fetch_nutrients(db, food.id).await?;
    if food.kind == FoodKind::Recipe {
        food.ingredients = recipes::fetch_ingredients(db, food.id).await?;
    }
    Ok(food)
}

/// Current, non-deleted records visible to the user: their own plus public
/// ones, foods before recipes, each ordered by name.
#[instrument(skip(db))]
pub async fn list_records(db: &PgPool, user_id: Uuid) -> Result<Vec<Food>> {
    Ok(repo::list_visible(db, user_id).await?)
}

/// Full version history of the family owning `version_id`, newest first.
/// Unknown ids and deleted families yield an empty list.
#[instrument(skip(db))]
pub async fn list_versions(db: &PgPool, version_id: Uuid) -> Result<Vec<Food>> {
    let Some(family_id) = repo::resolve_family(db, version_id).await? else {
        return Ok(Vec::new());
    };
    Ok(repo::list_versions(db, family_id).await?)
}

/// Soft-deletes every version of the owning family. Idempotent: unknown ids
/// and already-deleted families are a no-op.
#[instrument(skip(db))]
pub async fn delete_record(db: &PgPool, version_id: Uuid) -> Result<()> {
    let Some(family_id) = repo::resolve_family(db, version_id).await? else {
        return Ok(());
    };
    let affected =
        repo::soft_delete_family(db, family_id, OffsetDateTime::now_utc()).await?;
    if affected > 0 {
        info!(family = %family_id, versions = affected, "soft-deleted record family");
    }
    Ok(())
}
