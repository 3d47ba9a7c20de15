use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;

use crate::database::models::{SelectionRow, StatKind};
use crate::database::repository::StatsRepository;
use crate::error::FlowError;
use crate::utils::datetime::{format_date, DateRange};
use crate::utils::html::escape_html;

/// Window a report is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    Range(DateRange),
    AllTime,
}

/// Explicit formatting settings for rendered reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    pub date_format: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// One aggregated line of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceCount {
    pub label: String,
    pub count: usize,
    pub interpretation: String,
}

/// Counts rows per label, most frequent first.
///
/// Groups keep the order their label was first seen in, and the sort is
/// stable, so equal counts stay in first-encountered order.
pub fn aggregate(rows: &[SelectionRow]) -> Vec<ChoiceCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ChoiceCount> = Vec::new();

    for row in rows {
        match positions.get(row.label.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(&row.label, counts.len());
                counts.push(ChoiceCount {
                    label: row.label.clone(),
                    count: 1,
                    interpretation: row.interpretation.clone(),
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Turns a user's submissions into a readable statistics message.
pub struct StatsReportBuilder {
    repository: Arc<dyn StatsRepository>,
    format: ReportFormat,
}

impl StatsReportBuilder {
    pub fn new(repository: Arc<dyn StatsRepository>, format: ReportFormat) -> Self {
        Self { repository, format }
    }

    /// Formats a date the same way reports do.
    pub fn format_date(&self, dt: &NaiveDateTime) -> String {
        format_date(dt, &self.format.date_format)
    }

    /// Builds the report text for the user with Telegram id `tg_id`.
    ///
    /// An empty window is not an error: it renders a "no submissions" text.
    pub async fn build(
        &self,
        tg_id: i64,
        scope: ReportScope,
        kind: StatKind,
    ) -> Result<String, FlowError> {
        let user = self
            .repository
            .find_user(tg_id)
            .await?
            .ok_or_else(|| FlowError::NotFound("user".to_string()))?;

        let rows = match scope {
            ReportScope::Range(range) => {
                self.repository
                    .selections_in_range(user.id, kind, range.start, range.end)
                    .await?
            }
            ReportScope::AllTime => self.repository.all_selections(user.id, kind).await?,
        };

        tracing::debug!(
            "Building {} report for user {} over {} rows",
            kind.as_str(),
            tg_id,
            rows.len()
        );

        if rows.is_empty() {
            return Ok(self.render_empty(scope, kind));
        }

        Ok(self.render(scope, kind, &aggregate(&rows)))
    }

    fn render_empty(&self, scope: ReportScope, kind: StatKind) -> String {
        match (scope, kind) {
            (ReportScope::Range(range), _) => format!(
                "No submissions between {} and {}.",
                self.format_date(&range.start),
                self.format_date(&range.end)
            ),
            (ReportScope::AllTime, StatKind::Time) => "You have not recorded any times yet.".to_string(),
            (ReportScope::AllTime, StatKind::Numbers) => {
                "You have not recorded any numbers yet.".to_string()
            }
        }
    }

    fn render(&self, scope: ReportScope, kind: StatKind, counts: &[ChoiceCount]) -> String {
        let subject = match kind {
            StatKind::Time => "Time signs",
            StatKind::Numbers => "Number signs",
        };
        let header = match scope {
            ReportScope::Range(range) => format!(
                "<b>{} from {} to {}:</b>",
                subject,
                self.format_date(&range.start),
                self.format_date(&range.end)
            ),
            ReportScope::AllTime => format!("<b>{subject} of all time:</b>"),
        };

        let lines: Vec<String> = counts
            .iter()
            .map(|c| {
                format!(
                    "{}: {} — {}",
                    escape_html(&c.label),
                    c.count,
                    escape_html(&c.interpretation)
                )
            })
            .collect();

        format!("{}\n\n{}", header, lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn row(label: &str) -> SelectionRow {
        SelectionRow {
            label: label.to_string(),
            interpretation: format!("meaning of {label}"),
        }
    }

    /// Repository with one user (tg id 42) whose submissions are timestamped rows.
    struct FakeRepository {
        rows: Vec<(NaiveDateTime, SelectionRow)>,
        fail: bool,
    }

    impl FakeRepository {
        fn new(rows: Vec<(NaiveDateTime, SelectionRow)>) -> Self {
            Self {
                rows,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl StatsRepository for FakeRepository {
        async fn find_user(&self, tg_id: i64) -> Result<Option<User>, sqlx::Error> {
            Ok((tg_id == 42).then(|| User {
                id: 1,
                tg_id,
                username: None,
                created_at: String::new(),
            }))
        }

        async fn create_user(&self, _tg_id: i64, _username: Option<String>) -> Result<User, sqlx::Error> {
            Err(sqlx::Error::RowNotFound)
        }

        async fn selections_in_range(
            &self,
            _user_id: i64,
            _kind: StatKind,
            start: NaiveDateTime,
            end: NaiveDateTime,
        ) -> Result<Vec<SelectionRow>, sqlx::Error> {
            if self.fail {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self
                .rows
                .iter()
                .filter(|(ts, _)| *ts >= start && *ts <= end)
                .map(|(_, r)| r.clone())
                .collect())
        }

        async fn all_selections(&self, _user_id: i64, _kind: StatKind) -> Result<Vec<SelectionRow>, sqlx::Error> {
            Ok(self.rows.iter().map(|(_, r)| r.clone()).collect())
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_aggregate_sorts_by_count_then_first_seen() {
        let rows = vec![row("11:11"), row("22:22"), row("12:12"), row("22:22"), row("12:12"), row("01:01")];
        let counts = aggregate(&rows);
        let labels: Vec<(&str, usize)> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("22:22", 2), ("12:12", 2), ("11:11", 1), ("01:01", 1)]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_ranged_report_lines() {
        let repo = FakeRepository::new(vec![
            (at(10, 9), row("11:11")),
            (at(11, 9), row("22:22")),
            (at(12, 9), row("22:22")),
            (at(20, 9), row("33:33")),
        ]);
        let builder = StatsReportBuilder::new(Arc::new(repo), ReportFormat::default());

        let range = DateRange::from_days(day(10), day(15));
        let text = builder.build(42, ReportScope::Range(range), StatKind::Time).await.unwrap();

        assert_eq!(
            text,
            "<b>Time signs from 2024-03-10 to 2024-03-15:</b>\n\n\
             22:22: 2 — meaning of 22:22\n\
             11:11: 1 — meaning of 11:11"
        );
    }

    #[tokio::test]
    async fn test_inverted_range_gives_identical_report() {
        let rows = vec![(at(10, 0), row("10:10")), (at(15, 23), row("15:15"))];
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(rows)), ReportFormat::default());

        let forward = DateRange::from_days(day(10), day(15));
        let backward = DateRange::from_days(day(15), day(10));
        let a = builder.build(42, ReportScope::Range(forward), StatKind::Time).await.unwrap();
        let b = builder.build(42, ReportScope::Range(backward), StatKind::Time).await.unwrap();
        assert_eq!(a, b);
        assert!(a.contains("15:15: 1"));
    }

    #[tokio::test]
    async fn test_empty_range_message() {
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(vec![])), ReportFormat::default());
        let range = DateRange::from_days(day(10), day(15));
        let text = builder.build(42, ReportScope::Range(range), StatKind::Numbers).await.unwrap();
        assert_eq!(text, "No submissions between 2024-03-10 and 2024-03-15.");
    }

    #[tokio::test]
    async fn test_custom_date_format() {
        let format = ReportFormat {
            date_format: "%d.%m.%Y".to_string(),
        };
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(vec![])), format);
        let range = DateRange::from_days(day(1), day(2));
        let text = builder.build(42, ReportScope::Range(range), StatKind::Time).await.unwrap();
        assert_eq!(text, "No submissions between 01.03.2024 and 02.03.2024.");
    }

    #[tokio::test]
    async fn test_all_time_report() {
        let rows = vec![(at(1, 0), row("111")), (at(2, 0), row("111"))];
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(rows)), ReportFormat::default());
        let text = builder.build(42, ReportScope::AllTime, StatKind::Numbers).await.unwrap();
        assert_eq!(text, "<b>Number signs of all time:</b>\n\n111: 2 — meaning of 111");

        let empty = StatsReportBuilder::new(Arc::new(FakeRepository::new(vec![])), ReportFormat::default());
        let text = empty.build(42, ReportScope::AllTime, StatKind::Time).await.unwrap();
        assert_eq!(text, "You have not recorded any times yet.");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(vec![])), ReportFormat::default());
        let err = builder.build(7, ReportScope::AllTime, StatKind::Time).await.unwrap_err();
        assert!(matches!(err, FlowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_repository_failure_is_dependency_error() {
        let mut repo = FakeRepository::new(vec![]);
        repo.fail = true;
        let builder = StatsReportBuilder::new(Arc::new(repo), ReportFormat::default());
        let range = DateRange::from_days(day(1), day(2));
        let err = builder.build(42, ReportScope::Range(range), StatKind::Time).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_interpretations_are_escaped() {
        let rows = vec![(
            at(1, 0),
            SelectionRow {
                label: "<7>".to_string(),
                interpretation: "Fish & chips".to_string(),
            },
        )];
        let builder = StatsReportBuilder::new(Arc::new(FakeRepository::new(rows)), ReportFormat::default());
        let text = builder.build(42, ReportScope::AllTime, StatKind::Numbers).await.unwrap();
        assert!(text.ends_with("&lt;7&gt;: 1 — Fish &amp; chips"));
    }
}
