use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::repo as catalog_repo;
use crate::error::{Error, Result};
use crate::logs::dto::LogDraft;
use crate::logs::repo;
use crate::model::LogEntry;
use crate::timeframe;

/// Appends a consumption event pinned to one exact food version. The pinned
/// version must exist but may be superseded or soft-deleted; history stays
/// reproducible no matter what happens to the catalog afterwards.
#[instrument(skip(db, draft), fields(food_id = %draft.food_id))]
pub async fn append(db: &PgPool, user_id: Uuid, draft: LogDraft) -> Result<LogEntry> {
    draft.validate()?;
    catalog_repo::fetch_version(db, draft.food_id)
        .await?
        .ok_or(Error::NotFound("food version"))?;

    let now = OffsetDateTime::now_utc();
    let entry = LogEntry {
        id: Uuid::now_v7(),
        user_id,
        food_id: draft.food_id,
        amount: draft.amount,
        meal_tag: draft.meal_tag,
        logged_at: draft.logged_at.unwrap_or(now),
        created_at: now,
        deleted_at: None,
    };
    repo::insert_entry(db, &entry).await?;
    info!(entry = %entry.id, "appended log entry");
    Ok(entry)
}

/// Non-deleted entries in `[start, end)`, ascending by logged-at.
#[instrument(skip(db))]
pub async fn query_range(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<LogEntry>> {
    Ok(repo::select_range(db, user_id, start, end).await?)
}

/// One calendar day of entries; `date` defaults to today, UTC.
#[instrument(skip(db))]
pub async fn list_for_day(db: &PgPool, user_id: Uuid, date: Option<Date>) -> Result<Vec<LogEntry>> {
    let date = date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let (start, end) = timeframe::day_window(date);
    query_range(db, user_id, start, end).await
}

/// Soft-deletes a single entry. The ownership check is mandatory: a foreign
/// entry is not-authorized, an unknown or already-deleted one is not-found.
#[instrument(skip(db))]
pub async fn soft_delete(db: &PgPool, entry_id: Uuid, requesting_user_id: Uuid) -> Result<()> {
    let owner = repo::owner_of(db, entry_id)
        .await?
        .ok_or(Error::NotFound("log entry"))?;
    if owner != requesting_user_id {
        return Err(Error::NotAuthorized);
    }
    repo::soft_delete(db, entry_id, OffsetDateTime::now_utc()).await?;
    info!(entry = %entry_id, "soft-deleted log entry");
    Ok(())
}
