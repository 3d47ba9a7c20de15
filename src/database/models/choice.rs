use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bucket of the day grouping time choices on the keyboard.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeRange {
    pub id: i64,
    pub name: String,
    pub time_range: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeChoice {
    pub id: i64,
    pub choice: String,
    pub interpretation: String,
    pub time_range_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NumberChoice {
    pub id: i64,
    pub number: i64,
    pub interpretation: String,
}

/// A time choice joined with the label of its bucket, for listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeChoiceWithRange {
    pub choice: String,
    pub interpretation: String,
    pub time_range: String,
}

impl TimeRange {
    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TimeRange>("SELECT id, name, time_range FROM time_ranges ORDER BY id")
            .fetch_all(pool)
            .await
    }
}

impl TimeChoice {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TimeChoice>(
            "SELECT id, choice, interpretation, time_range_id FROM time_choices WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_range(
        pool: &sqlx::SqlitePool,
        time_range_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TimeChoice>(
            "SELECT id, choice, interpretation, time_range_id FROM time_choices WHERE time_range_id = ? ORDER BY choice"
        )
        .bind(time_range_id)
        .fetch_all(pool)
        .await
    }

    /// Every time choice with its bucket label, ordered bucket by bucket.
    pub async fn all_with_ranges(
        pool: &sqlx::SqlitePool,
    ) -> Result<Vec<TimeChoiceWithRange>, sqlx::Error> {
        sqlx::query_as::<_, TimeChoiceWithRange>(
            "SELECT c.choice, c.interpretation, r.time_range
             FROM time_choices c
             JOIN time_ranges r ON c.time_range_id = r.id
             ORDER BY r.id, c.choice"
        )
        .fetch_all(pool)
        .await
    }
}

impl NumberChoice {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, NumberChoice>(
            "SELECT id, number, interpretation FROM numbers_choices WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, NumberChoice>(
            "SELECT id, number, interpretation FROM numbers_choices ORDER BY number"
        )
        .fetch_all(pool)
        .await
    }
}
