use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last millisecond of `date` (23:59:59.999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // Never leaves `date`, so it holds for NaiveDate::MAX too
    start_of_day(date) + (Duration::days(1) - Duration::milliseconds(1))
}

pub fn format_date(dt: &NaiveDateTime, format: &str) -> String {
    dt.format(format).to_string()
}

/// Inclusive range of instants, always ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Covers both days entirely, whichever order they were picked in.
    pub fn from_days(first: NaiveDate, second: NaiveDate) -> Self {
        let (start, end) = if second < first {
            (second, first)
        } else {
            (first, second)
        };
        Self {
            start: start_of_day(start),
            end: end_of_day(end),
        }
    }

    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Ranges offered as one-tap buttons. Weeks start on Monday, like the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedRange {
    ThisWeek,
    LastWeek,
    ThisMonth,
}

impl PredefinedRange {
    /// Resolves the range against the current instant.
    pub fn resolve(self, now: NaiveDateTime) -> DateRange {
        let today = now.date();
        let since_monday = i64::from(today.weekday().num_days_from_monday());

        match self {
            PredefinedRange::ThisWeek => {
                DateRange::from_days(today - Duration::days(since_monday), today)
            }
            PredefinedRange::LastWeek => {
                let monday = today - Duration::days(since_monday + 7);
                DateRange::from_days(monday, monday + Duration::days(6))
            }
            PredefinedRange::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                DateRange::from_days(first, today)
            }
        }
    }

    pub const ALL: [PredefinedRange; 3] = [
        PredefinedRange::ThisWeek,
        PredefinedRange::LastWeek,
        PredefinedRange::ThisMonth,
    ];

    /// Token suffix used in callback data (`stat_range_this_week`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            PredefinedRange::ThisWeek => "this_week",
            PredefinedRange::LastWeek => "last_week",
            PredefinedRange::ThisMonth => "this_month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            PredefinedRange::ThisWeek => "This week",
            PredefinedRange::LastWeek => "Last week",
            PredefinedRange::ThisMonth => "This month",
        }
    }
}
