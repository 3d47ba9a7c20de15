use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which kind of sign a statistic is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Time,
    Numbers,
}

impl StatKind {
    /// Token suffix used in callback data (`stat_type_time`, `all_stat_numbers`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Time => "time",
            StatKind::Numbers => "numbers",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "time" => Some(StatKind::Time),
            "numbers" => Some(StatKind::Numbers),
            _ => None,
        }
    }
}

/// One submission as seen by the statistics: the choice label and its meaning.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SelectionRow {
    pub label: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimeSelection {
    pub id: String,
    pub user_id: i64,
    pub time_choice_id: i64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NumberSelection {
    pub id: String,
    pub user_id: i64,
    pub number_choice_id: i64,
    pub timestamp: NaiveDateTime,
}

impl TimeSelection {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        time_choice_id: i64,
        timestamp: NaiveDateTime,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO time_selections (id, user_id, time_choice_id, timestamp) VALUES (?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(user_id)
        .bind(time_choice_id)
        .bind(timestamp)
        .execute(pool)
        .await?;

        Ok(TimeSelection {
            id,
            user_id,
            time_choice_id,
            timestamp,
        })
    }
}

impl NumberSelection {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        number_choice_id: i64,
        timestamp: NaiveDateTime,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO number_selections (id, user_id, number_choice_id, timestamp) VALUES (?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(user_id)
        .bind(number_choice_id)
        .bind(timestamp)
        .execute(pool)
        .await?;

        Ok(NumberSelection {
            id,
            user_id,
            number_choice_id,
            timestamp,
        })
    }
}

fn selection_query(kind: StatKind, ranged: bool) -> String {
    let (label, selections, choices, fk) = match kind {
        StatKind::Time => ("c.choice", "time_selections", "time_choices", "time_choice_id"),
        StatKind::Numbers => (
            "CAST(c.number AS TEXT)",
            "number_selections",
            "numbers_choices",
            "number_choice_id",
        ),
    };
    let window = if ranged {
        " AND s.timestamp >= ? AND s.timestamp <= ?"
    } else {
        ""
    };

    format!(
        "SELECT {label} AS label, c.interpretation AS interpretation
         FROM {selections} s
         JOIN {choices} c ON s.{fk} = c.id
         WHERE s.user_id = ?{window}
         ORDER BY s.timestamp, s.rowid"
    )
}

impl SelectionRow {
    /// Submissions of `kind` by `user_id` with timestamps inside `[start, end]`.
    pub async fn in_range(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        kind: StatKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = selection_query(kind, true);
        sqlx::query_as::<_, SelectionRow>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    pub async fn all(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        kind: StatKind,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = selection_query(kind, false);
        sqlx::query_as::<_, SelectionRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
