use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::User;

impl User {
    pub async fn create(db: &PgPool, name: &str, email: &str) -> Result<User> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(Error::validation("name and email must not be empty"));
        }
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: email.to_string(),
            disabled_at: None,
            created_at: OffsetDateTime::now_utc(),
        };
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.created_at)
        .execute(db)
        .await
        .map_err(|e| Error::on_unique(e, "a user with that name or email already exists"))?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, disabled_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, disabled_at, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(db: &PgPool, id: Uuid, name: &str, email: &str) -> Result<User> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(Error::validation("name and email must not be empty"));
        }
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $1, email = $2
            WHERE id = $3
            RETURNING id, name, email, disabled_at, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| Error::on_unique(e, "a user with that name or email already exists"))?;
        user.ok_or(Error::NotFound("user"))
    }

    /// Disables the account without touching its logs or foods. Idempotent;
    /// the original disabled-at timestamp is kept on repeat calls.
    pub async fn disable(db: &PgPool, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET disabled_at = $1 WHERE id = $2 AND disabled_at IS NULL",
        )
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(db)
        .await?;
        if result.rows_affected() == 0 && User::find_by_id(db, id).await?.is_none() {
            return Err(Error::NotFound("user"));
        }
        Ok(())
    }
}
