use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tg_id: i64,
    pub username: Option<String>,
    pub created_at: String,
}

impl User {
    pub async fn find_by_tg_id(
        pool: &sqlx::SqlitePool,
        tg_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, tg_id, username, created_at FROM users WHERE tg_id = ?"
        )
        .bind(tg_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        tg_id: i64,
        username: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (tg_id, username, created_at) VALUES (?, ?, ?) ON CONFLICT(tg_id) DO NOTHING"
        )
        .bind(tg_id)
        .bind(&username)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_tg_id(pool, tg_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Returns the existing user or registers a new one.
    pub async fn get_or_create(
        pool: &sqlx::SqlitePool,
        tg_id: i64,
        username: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        match Self::find_by_tg_id(pool, tg_id).await? {
            Some(user) => Ok(user),
            None => Self::create(pool, tg_id, username).await,
        }
    }
}
