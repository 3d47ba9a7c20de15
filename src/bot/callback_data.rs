//! Decoding of inline keyboard callback data.
//!
//! Every button the bot renders carries one of the tokens below. They are
//! decoded exactly once, here, into a closed [`CallbackAction`].

use crate::database::models::StatKind;
use crate::utils::calendar::is_calendar_token;
use crate::utils::datetime::PredefinedRange;

pub const STAT_TYPE_PREFIX: &str = "stat_type_";
pub const STAT_RANGE_PREFIX: &str = "stat_range_";
pub const STAT_RANGE_CALENDAR: &str = "stat_range_calendar";
pub const TIME_RANGE_PREFIX: &str = "range_";
pub const TIME_CHOICE_PREFIX: &str = "time_";
pub const NUMBER_CHOICE_PREFIX: &str = "choose_number:";
pub const ALL_STAT_PREFIX: &str = "all_stat_";
pub const LIST_PREFIX: &str = "list_";
pub const ADD_MORE: &str = "add_more";
pub const BACK: &str = "back";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `day_*`, `prev_*`, `next_*` and `ignore`, handed to the conversation as is.
    Calendar(String),
    PickStatKind(StatKind),
    PickPredefinedRange(PredefinedRange),
    PickCustomCalendar,
    /// A time range bucket was opened on the `/time` keyboard.
    OpenTimeRange(i64),
    RecordTime { time_range_id: i64, choice_id: i64 },
    RecordNumber(i64),
    AddMore,
    Back,
    AllTimeStats(StatKind),
    ListInterpretations(StatKind),
    Unknown(String),
}

impl CallbackAction {
    pub fn decode(data: &str) -> Self {
        if is_calendar_token(data) {
            return CallbackAction::Calendar(data.to_string());
        }

        let decoded = match data {
            ADD_MORE => Some(CallbackAction::AddMore),
            BACK => Some(CallbackAction::Back),
            STAT_RANGE_CALENDAR => Some(CallbackAction::PickCustomCalendar),
            _ => Self::decode_prefixed(data),
        };

        decoded.unwrap_or_else(|| CallbackAction::Unknown(data.to_string()))
    }

    fn decode_prefixed(data: &str) -> Option<Self> {
        if let Some(kind) = data.strip_prefix(STAT_TYPE_PREFIX) {
            return StatKind::parse(kind).map(CallbackAction::PickStatKind);
        }
        if let Some(range) = data.strip_prefix(STAT_RANGE_PREFIX) {
            return PredefinedRange::parse(range).map(CallbackAction::PickPredefinedRange);
        }
        if let Some(kind) = data.strip_prefix(ALL_STAT_PREFIX) {
            return StatKind::parse(kind).map(CallbackAction::AllTimeStats);
        }
        if let Some(kind) = data.strip_prefix(LIST_PREFIX) {
            return StatKind::parse(kind).map(CallbackAction::ListInterpretations);
        }
        if let Some(id) = data.strip_prefix(TIME_RANGE_PREFIX) {
            return id.parse().ok().map(CallbackAction::OpenTimeRange);
        }
        if let Some(id) = data.strip_prefix(NUMBER_CHOICE_PREFIX) {
            return id.parse().ok().map(CallbackAction::RecordNumber);
        }
        if let Some(rest) = data.strip_prefix(TIME_CHOICE_PREFIX) {
            let (range, choice) = rest.split_once('_')?;
            return Some(CallbackAction::RecordTime {
                time_range_id: range.parse().ok()?,
                choice_id: choice.parse().ok()?,
            });
        }
        None
    }
}

pub fn stat_kind_token(kind: StatKind) -> String {
    format!("{STAT_TYPE_PREFIX}{}", kind.as_str())
}

pub fn stat_range_token(range: PredefinedRange) -> String {
    format!("{STAT_RANGE_PREFIX}{}", range.as_str())
}

pub fn time_range_token(time_range_id: i64) -> String {
    format!("{TIME_RANGE_PREFIX}{time_range_id}")
}

pub fn time_choice_token(time_range_id: i64, choice_id: i64) -> String {
    format!("{TIME_CHOICE_PREFIX}{time_range_id}_{choice_id}")
}

pub fn number_choice_token(number_choice_id: i64) -> String {
    format!("{NUMBER_CHOICE_PREFIX}{number_choice_id}")
}

pub fn all_stat_token(kind: StatKind) -> String {
    format!("{ALL_STAT_PREFIX}{}", kind.as_str())
}

pub fn list_token(kind: StatKind) -> String {
    format!("{LIST_PREFIX}{}", kind.as_str())
}
