use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::database::connection::DatabaseManager;
use crate::database::models::{SelectionRow, StatKind, User};

/// Data access needed by the statistics flow.
///
/// Implemented by [`DatabaseManager`]; tests substitute in-memory fakes.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn find_user(&self, tg_id: i64) -> Result<Option<User>, sqlx::Error>;

    async fn create_user(&self, tg_id: i64, username: Option<String>) -> Result<User, sqlx::Error>;

    /// Registers the user on first contact; an existing user is returned as stored.
    async fn get_or_create_user(
        &self,
        tg_id: i64,
        username: Option<String>,
    ) -> Result<User, sqlx::Error> {
        match self.find_user(tg_id).await? {
            Some(user) => Ok(user),
            None => self.create_user(tg_id, username).await,
        }
    }

    /// Submissions ordered oldest first, inclusive on both bounds.
    async fn selections_in_range(
        &self,
        user_id: i64,
        kind: StatKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<SelectionRow>, sqlx::Error>;

    async fn all_selections(
        &self,
        user_id: i64,
        kind: StatKind,
    ) -> Result<Vec<SelectionRow>, sqlx::Error>;
}

#[async_trait]
impl StatsRepository for DatabaseManager {
    async fn find_user(&self, tg_id: i64) -> Result<Option<User>, sqlx::Error> {
        User::find_by_tg_id(&self.pool, tg_id).await
    }

    async fn create_user(&self, tg_id: i64, username: Option<String>) -> Result<User, sqlx::Error> {
        User::create(&self.pool, tg_id, username).await
    }

    async fn get_or_create_user(
        &self,
        tg_id: i64,
        username: Option<String>,
    ) -> Result<User, sqlx::Error> {
        User::get_or_create(&self.pool, tg_id, username).await
    }

    async fn selections_in_range(
        &self,
        user_id: i64,
        kind: StatKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<SelectionRow>, sqlx::Error> {
        SelectionRow::in_range(&self.pool, user_id, kind, start, end).await
    }

    async fn all_selections(
        &self,
        user_id: i64,
        kind: StatKind,
    ) -> Result<Vec<SelectionRow>, sqlx::Error> {
        SelectionRow::all(&self.pool, user_id, kind).await
    }
}
