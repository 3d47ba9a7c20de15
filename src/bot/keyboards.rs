use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::callback_data::{
    all_stat_token, list_token, number_choice_token, stat_kind_token, stat_range_token,
    time_choice_token, time_range_token, ADD_MORE, BACK, STAT_RANGE_CALENDAR,
};
use crate::database::models::{NumberChoice, StatKind, TimeChoice, TimeRange};
use crate::utils::calendar::{
    day_token, days_grid, month_name, page_token, CalendarCell, PageDirection, IGNORE_TOKEN,
};
use crate::utils::datetime::PredefinedRange;

const CHOICES_PER_ROW: usize = 3;
const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

fn button(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), data.into())
}

/// Month calendar: header, weekday names, day grid, then paging arrows.
pub fn calendar(year: i32, month: u32) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![button(format!("{} {}", month_name(month), year), IGNORE_TOKEN)],
        WEEKDAYS
            .iter()
            .map(|day| button(*day, IGNORE_TOKEN))
            .collect(),
    ];

    for week in days_grid(year, month) {
        rows.push(
            week.iter()
                .map(|cell| match cell {
                    CalendarCell::Empty => button(" ", IGNORE_TOKEN),
                    CalendarCell::Day(day) => button(day.to_string(), day_token(*day)),
                })
                .collect(),
        );
    }

    rows.push(vec![
        button("<", page_token(PageDirection::Prev, year, month)),
        button(" ", IGNORE_TOKEN),
        button(">", page_token(PageDirection::Next, year, month)),
    ]);

    InlineKeyboardMarkup::new(rows)
}

pub fn stat_kind_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("🕐 Time", stat_kind_token(StatKind::Time)),
        button("🔢 Numbers", stat_kind_token(StatKind::Numbers)),
    ]])
}

pub fn range_menu() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = PredefinedRange::ALL
        .into_iter()
        .map(|range| vec![button(range.label(), stat_range_token(range))])
        .collect();
    rows.push(vec![button("📅 Pick dates", STAT_RANGE_CALENDAR)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn time_ranges(ranges: &[TimeRange]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        ranges
            .iter()
            .map(|range| vec![button(range.time_range.as_str(), time_range_token(range.id))]),
    )
}

/// Choices of one time range, three per row, followed by a Back button.
pub fn time_choices(choices: &[TimeChoice]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = choices
        .chunks(CHOICES_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|c| button(c.choice.as_str(), time_choice_token(c.time_range_id, c.id)))
                .collect()
        })
        .collect();
    rows.push(vec![button("⬅️ Back", BACK)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn number_choices(choices: &[NumberChoice]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(choices.chunks(CHOICES_PER_ROW).map(|chunk| {
        chunk
            .iter()
            .map(|c| button(c.number.to_string(), number_choice_token(c.id)))
            .collect::<Vec<_>>()
    }))
}

pub fn add_more() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("➕ Add more", ADD_MORE)]])
}

pub fn all_stat_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("🕐 Time", all_stat_token(StatKind::Time)),
        button("🔢 Numbers", all_stat_token(StatKind::Numbers)),
    ]])
}

pub fn list_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("🕐 Time meanings", list_token(StatKind::Time)),
        button("🔢 Number meanings", list_token(StatKind::Numbers)),
    ]])
}
