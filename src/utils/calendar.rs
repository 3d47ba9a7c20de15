//! Inline calendar arithmetic and navigation tokens.
//!
//! Everything here is pure: the bot keyboards are built from [`days_grid`]
//! and page/day buttons round-trip through [`decode_intent`].

use chrono::{Datelike, NaiveDate};

/// Token carried by header, weekday and padding buttons.
pub const IGNORE_TOKEN: &str = "ignore";

const DAY_PREFIX: &str = "day_";
const PREV_PREFIX: &str = "prev_";
const NEXT_PREFIX: &str = "next_";

/// A single cell of a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Empty,
    Day(u32),
}

/// Direction of a month page turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}

/// A decoded calendar button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarIntent {
    /// A day of the currently viewed month was picked.
    DaySelected(u32),
    /// The user asked to move away from the month shown on the keyboard.
    PageRequested {
        year: i32,
        month: u32,
        direction: PageDirection,
    },
    /// Not a calendar token, or a decorative button.
    Ignored,
    /// A calendar token whose numbers do not parse.
    Malformed,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month`, or 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Builds the Monday-first week rows of a month.
///
/// Leading cells before the 1st and trailing cells after the last day are
/// [`CalendarCell::Empty`]. An invalid month produces no rows.
pub fn days_grid(year: i32, month: u32) -> Vec<[CalendarCell; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let offset = first.weekday().num_days_from_monday() as usize;
    let last_day = days_in_month(year, month);

    let mut weeks = Vec::with_capacity(6);
    let mut week = [CalendarCell::Empty; 7];
    let mut column = offset;

    for day in 1..=last_day {
        week[column] = CalendarCell::Day(day);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [CalendarCell::Empty; 7];
            column = 0;
        }
    }

    if column > 0 {
        weeks.push(week);
    }

    weeks
}

/// Moves one month in `direction`, wrapping the year.
///
/// At the ends of the `i32` year range the month stays where it is.
pub fn page(year: i32, month: u32, direction: PageDirection) -> (i32, u32) {
    match direction {
        PageDirection::Prev if month <= 1 => year
            .checked_sub(1)
            .map_or((year, month), |year| (year, 12)),
        PageDirection::Prev => (year, month - 1),
        PageDirection::Next if month >= 12 => year
            .checked_add(1)
            .map_or((year, month), |year| (year, 1)),
        PageDirection::Next => (year, month + 1),
    }
}

/// Years a page token may carry: paging one month from any of them stays
/// within the dates chrono can represent.
fn is_pageable_year(year: i32) -> bool {
    (NaiveDate::MIN.year() + 1..=NaiveDate::MAX.year() - 1).contains(&year)
}

pub fn day_token(day: u32) -> String {
    format!("{DAY_PREFIX}{day}")
}

pub fn page_token(direction: PageDirection, year: i32, month: u32) -> String {
    let prefix = match direction {
        PageDirection::Prev => PREV_PREFIX,
        PageDirection::Next => NEXT_PREFIX,
    };
    format!("{prefix}{year}_{month}")
}

/// Whether `token` belongs to the calendar namespace at all.
pub fn is_calendar_token(token: &str) -> bool {
    token == IGNORE_TOKEN
        || token.starts_with(DAY_PREFIX)
        || token.starts_with(PREV_PREFIX)
        || token.starts_with(NEXT_PREFIX)
}

/// Parses a calendar button token. Never fails: unknown input is
/// [`CalendarIntent::Ignored`].
pub fn decode_intent(token: &str) -> CalendarIntent {
    if let Some(day) = token.strip_prefix(DAY_PREFIX) {
        return match day.parse::<u32>() {
            Ok(day) if (1..=31).contains(&day) => CalendarIntent::DaySelected(day),
            _ => CalendarIntent::Malformed,
        };
    }

    let (direction, rest) = if let Some(rest) = token.strip_prefix(PREV_PREFIX) {
        (PageDirection::Prev, rest)
    } else if let Some(rest) = token.strip_prefix(NEXT_PREFIX) {
        (PageDirection::Next, rest)
    } else {
        return CalendarIntent::Ignored;
    };

    let Some((year, month)) = rest.split_once('_') else {
        return CalendarIntent::Malformed;
    };

    match (year.parse::<i32>(), month.parse::<u32>()) {
        (Ok(year), Ok(month)) if (1..=12).contains(&month) && is_pageable_year(year) => {
            CalendarIntent::PageRequested {
                year,
                month,
                direction,
            }
        }
        _ => CalendarIntent::Malformed,
    }
}

/// English month name for keyboard headers.
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_of(grid: &[[CalendarCell; 7]]) -> Vec<u32> {
        grid.iter()
            .flat_map(|week| week.iter())
            .filter_map(|cell| match cell {
                CalendarCell::Day(d) => Some(*d),
                CalendarCell::Empty => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_contains_every_day_in_order() {
        for year in [1900, 1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let grid = days_grid(year, month);
                let expected: Vec<u32> = (1..=days_in_month(year, month)).collect();
                assert_eq!(days_of(&grid), expected, "{year}-{month}");
            }
        }
    }

    #[test]
    fn test_grid_is_monday_first() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let grid = days_grid(year, month);
                for (row, week) in grid.iter().enumerate() {
                    for (column, cell) in week.iter().enumerate() {
                        if let CalendarCell::Day(day) = cell {
                            let date = NaiveDate::from_ymd_opt(year, month, *day).unwrap();
                            assert_eq!(
                                date.weekday().num_days_from_monday() as usize,
                                column,
                                "{date} in row {row}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_march_2024_layout() {
        // 1 March 2024 is a Friday
        let grid = days_grid(2024, 3);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0..4], [CalendarCell::Empty; 4]);
        assert_eq!(grid[0][4], CalendarCell::Day(1));
        assert_eq!(grid[4][6], CalendarCell::Day(31));
    }

    #[test]
    fn test_february_padding() {
        // February 2021 starts on Monday and fills exactly four weeks
        let grid = days_grid(2021, 2);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], CalendarCell::Day(1));
        assert_eq!(grid[3][6], CalendarCell::Day(28));

        let leap = days_grid(2024, 2);
        assert_eq!(days_of(&leap).last(), Some(&29));
        assert_eq!(leap.last().unwrap()[4..], [CalendarCell::Empty; 3]);
    }

    #[test]
    fn test_grid_is_deterministic() {
        assert_eq!(days_grid(2024, 7), days_grid(2024, 7));
    }

    #[test]
    fn test_invalid_month_has_no_rows() {
        assert!(days_grid(2024, 0).is_empty());
        assert!(days_grid(2024, 13).is_empty());
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_page_rollover() {
        assert_eq!(page(2024, 1, PageDirection::Prev), (2023, 12));
        assert_eq!(page(2024, 12, PageDirection::Next), (2025, 1));
        assert_eq!(page(2024, 6, PageDirection::Prev), (2024, 5));
        assert_eq!(page(2024, 6, PageDirection::Next), (2024, 7));
    }

    #[test]
    fn test_decode_day_and_page_tokens() {
        assert_eq!(decode_intent("day_15"), CalendarIntent::DaySelected(15));
        assert_eq!(
            decode_intent(&page_token(PageDirection::Prev, 2024, 1)),
            CalendarIntent::PageRequested {
                year: 2024,
                month: 1,
                direction: PageDirection::Prev
            }
        );
        assert_eq!(
            decode_intent("next_2023_12"),
            CalendarIntent::PageRequested {
                year: 2023,
                month: 12,
                direction: PageDirection::Next
            }
        );
        assert_eq!(decode_intent(&day_token(7)), CalendarIntent::DaySelected(7));
    }

    #[test]
    fn test_decode_never_panics_on_garbage() {
        assert_eq!(decode_intent(IGNORE_TOKEN), CalendarIntent::Ignored);
        assert_eq!(decode_intent(""), CalendarIntent::Ignored);
        assert_eq!(decode_intent("stat_range_this_week"), CalendarIntent::Ignored);
        assert_eq!(decode_intent("day_"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("day_abc"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("day_0"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("day_32"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("prev_2024"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("next_2024_13"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("next_x_1"), CalendarIntent::Malformed);
    }

    #[test]
    fn test_page_at_year_limits_does_not_overflow() {
        assert_eq!(page(i32::MAX, 12, PageDirection::Next), (i32::MAX, 12));
        assert_eq!(page(i32::MIN, 1, PageDirection::Prev), (i32::MIN, 1));
        assert_eq!(page(i32::MAX, 11, PageDirection::Next), (i32::MAX, 12));
    }

    #[test]
    fn test_decode_rejects_years_chrono_cannot_page() {
        let max = NaiveDate::MAX.year();
        let min = NaiveDate::MIN.year();

        assert_eq!(decode_intent("next_2147483647_12"), CalendarIntent::Malformed);
        assert_eq!(decode_intent("prev_-2147483648_1"), CalendarIntent::Malformed);
        assert_eq!(decode_intent(&format!("next_{max}_11")), CalendarIntent::Malformed);
        assert_eq!(decode_intent(&format!("prev_{min}_1")), CalendarIntent::Malformed);
        assert_eq!(
            decode_intent(&format!("next_{}_12", max - 1)),
            CalendarIntent::PageRequested {
                year: max - 1,
                month: 12,
                direction: PageDirection::Next
            }
        );
    }

    #[test]
    fn test_every_decodable_page_lands_on_a_real_month() {
        let max = NaiveDate::MAX.year();
        let min = NaiveDate::MIN.year();
        for token in [format!("next_{}_12", max - 1), format!("prev_{}_1", min + 1)] {
            let CalendarIntent::PageRequested { year, month, direction } = decode_intent(&token) else {
                panic!("{token} should decode");
            };
            let (year, month) = page(year, month, direction);
            assert!(!days_grid(year, month).is_empty(), "{token}");
        }
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
    }
}
