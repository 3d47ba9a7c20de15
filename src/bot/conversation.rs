//! The ranged statistics conversation.
//!
//! `/stat_range` walks the user through: statistic kind → predefined range
//! or calendar → start date → end date → report. [`ConversationController`]
//! owns every transition; it never talks to Telegram directly and instead
//! returns [`Effect`]s for the transport to apply.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::sync::Arc;

use crate::database::models::StatKind;
use crate::error::FlowError;
use crate::services::report::{ReportScope, StatsReportBuilder};
use crate::services::session_store::{FlowState, Session, SessionPayload, SessionStore};
use crate::utils::calendar::{decode_intent, page, CalendarIntent, PageDirection};
use crate::utils::datetime::{start_of_day, DateRange, PredefinedRange};
use crate::utils::logging::{log_flow_rejected, log_flow_transition};

pub const RESTART_MESSAGE: &str = "Please start again with /stat_range.";
pub const FAILURE_MESSAGE: &str =
    "Something went wrong while loading your statistics. Please try the same step again.";
pub const USER_NOT_FOUND_MESSAGE: &str = "You are not registered yet. Send /start first.";
pub const CANCELLED_MESSAGE: &str = "Statistics request cancelled.";
pub const NOTHING_TO_CANCEL_MESSAGE: &str = "There is nothing to cancel.";
pub const START_DATE_PROMPT: &str = "Select the start date:";
pub const END_DATE_PROMPT: &str = "Now select the end date:";

/// A typed user action in the statistics flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StartRangedStats,
    PickStatKind(StatKind),
    PickPredefinedRange(PredefinedRange),
    PickCustomCalendar,
    /// Raw calendar button data, decoded by the controller.
    CalendarToken(String),
    Cancel,
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::StartRangedStats => "start_ranged_stats",
            Intent::PickStatKind(_) => "pick_stat_kind",
            Intent::PickPredefinedRange(_) => "pick_predefined_range",
            Intent::PickCustomCalendar => "pick_custom_calendar",
            Intent::CalendarToken(_) => "calendar_token",
            Intent::Cancel => "cancel",
        }
    }
}

/// What the transport should do in response to an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask which kind of statistics the user wants.
    PromptStatKind,
    /// Offer the predefined ranges and the calendar.
    PromptRange,
    /// Send a new message with a calendar for the month.
    RenderCalendar {
        year: i32,
        month: u32,
        prompt: &'static str,
    },
    /// Replace the keyboard of the calendar message that was paged.
    EditCalendar { year: i32, month: u32 },
    SendText(String),
}

pub struct ConversationController {
    sessions: Arc<dyn SessionStore>,
    reports: Arc<StatsReportBuilder>,
}

impl ConversationController {
    pub fn new(sessions: Arc<dyn SessionStore>, reports: Arc<StatsReportBuilder>) -> Self {
        Self { sessions, reports }
    }

    /// Applies `intent` for `user_id` at instant `now`.
    ///
    /// Never fails: every error is turned into a message for the user.
    pub async fn handle(&self, user_id: i64, intent: Intent, now: NaiveDateTime) -> Vec<Effect> {
        let session = self.sessions.get(user_id).await;
        let intent_name = intent.name();

        match intent {
            Intent::StartRangedStats => self.start(user_id).await,
            Intent::Cancel => self.cancel(user_id, session).await,
            Intent::PickStatKind(kind) => match session {
                Some(s) if s.state == FlowState::AwaitingStatKind => {
                    let patch = SessionPayload::with_stat_kind(kind);
                    self.transition(user_id, &s, FlowState::AwaitingPredefinedRange, patch)
                        .await;
                    vec![Effect::PromptRange]
                }
                other => Self::reject(user_id, intent_name, other.as_ref()),
            },
            Intent::PickPredefinedRange(range) => match session {
                Some(s) if s.state == FlowState::AwaitingPredefinedRange => {
                    let kind = s.payload.stat_kind.unwrap_or(StatKind::Time);
                    self.finish(user_id, ReportScope::Range(range.resolve(now)), kind).await
                }
                other => Self::reject(user_id, intent_name, other.as_ref()),
            },
            Intent::PickCustomCalendar => match session {
                Some(s) if s.state == FlowState::AwaitingPredefinedRange => {
                    let (year, month) = (now.year(), now.month());
                    let patch = SessionPayload::viewing(year, month);
                    self.transition(user_id, &s, FlowState::AwaitingStartDate, patch)
                        .await;
                    vec![Effect::RenderCalendar {
                        year,
                        month,
                        prompt: START_DATE_PROMPT,
                    }]
                }
                other => Self::reject(user_id, intent_name, other.as_ref()),
            },
            Intent::CalendarToken(raw) => match decode_intent(&raw) {
                CalendarIntent::Ignored => Vec::new(),
                CalendarIntent::Malformed => self.abort(user_id, &raw).await,
                CalendarIntent::PageRequested {
                    year,
                    month,
                    direction,
                } => self.turn_page(user_id, session, year, month, direction).await,
                CalendarIntent::DaySelected(day) => {
                    self.select_day(user_id, session, day, now).await
                }
            },
        }
    }

    async fn start(&self, user_id: i64) -> Vec<Effect> {
        // A new request always starts from a clean payload
        self.sessions.clear(user_id).await;
        self.sessions
            .set(user_id, FlowState::AwaitingStatKind, SessionPayload::default())
            .await;
        log_flow_transition(user_id, "Idle", "AwaitingStatKind");
        vec![Effect::PromptStatKind]
    }

    async fn cancel(&self, user_id: i64, session: Option<Session>) -> Vec<Effect> {
        match session {
            Some(s) => {
                self.sessions.clear(user_id).await;
                log_flow_transition(user_id, &format!("{:?}", s.state), "Idle");
                vec![Effect::SendText(CANCELLED_MESSAGE.to_string())]
            }
            None => vec![Effect::SendText(NOTHING_TO_CANCEL_MESSAGE.to_string())],
        }
    }

    async fn turn_page(
        &self,
        user_id: i64,
        session: Option<Session>,
        year: i32,
        month: u32,
        direction: PageDirection,
    ) -> Vec<Effect> {
        match session {
            Some(s) if Self::is_picking_date(&s) => {
                let (year, month) = page(year, month, direction);
                self.sessions
                    .set(user_id, s.state, SessionPayload::viewing(year, month))
                    .await;
                vec![Effect::EditCalendar { year, month }]
            }
            other => Self::reject(user_id, "calendar_page", other.as_ref()),
        }
    }

    async fn select_day(
        &self,
        user_id: i64,
        session: Option<Session>,
        day: u32,
        now: NaiveDateTime,
    ) -> Vec<Effect> {
        let s = match session {
            Some(s) if Self::is_picking_date(&s) => s,
            other => return Self::reject(user_id, "calendar_day", other.as_ref()),
        };

        let year = s.payload.viewed_year.unwrap_or_else(|| now.year());
        let month = s.payload.viewed_month.unwrap_or_else(|| now.month());
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return self.abort(user_id, &format!("day {day} of {year}-{month}")).await;
        };

        match s.state {
            FlowState::AwaitingStartDate => {
                let start = start_of_day(date);
                let patch = SessionPayload::with_start_date(start);
                self.transition(user_id, &s, FlowState::AwaitingEndDate, patch)
                    .await;
                let selected = format!("Start date selected: {}", self.reports.format_date(&start));
                vec![
                    Effect::SendText(selected),
                    Effect::RenderCalendar {
                        year,
                        month,
                        prompt: END_DATE_PROMPT,
                    },
                ]
            }
            _ => {
                let Some(start) = s.payload.start_date else {
                    return self.abort(user_id, "end date picked without a start date").await;
                };
                let kind = s.payload.stat_kind.unwrap_or(StatKind::Time);
                let range = DateRange::from_days(start.date(), date);
                self.finish(user_id, ReportScope::Range(range), kind).await
            }
        }
    }

    /// Builds the report and ends the flow, unless a retry makes sense.
    async fn finish(&self, user_id: i64, scope: ReportScope, kind: StatKind) -> Vec<Effect> {
        match self.reports.build(user_id, scope, kind).await {
            Ok(text) => {
                self.sessions.clear(user_id).await;
                log_flow_transition(user_id, "report", "Idle");
                vec![Effect::SendText(text)]
            }
            Err(e) if e.is_retryable() => {
                tracing::error!("Failed to build report for user {}: {}", user_id, e);
                vec![Effect::SendText(FAILURE_MESSAGE.to_string())]
            }
            Err(FlowError::NotFound(what)) => {
                tracing::warn!("Report for user {} aborted: {} not found", user_id, what);
                self.sessions.clear(user_id).await;
                vec![Effect::SendText(USER_NOT_FOUND_MESSAGE.to_string())]
            }
            Err(e) => {
                tracing::warn!("Report for user {} aborted: {}", user_id, e);
                self.sessions.clear(user_id).await;
                vec![Effect::SendText(RESTART_MESSAGE.to_string())]
            }
        }
    }

    async fn transition(&self, user_id: i64, from: &Session, to: FlowState, patch: SessionPayload) {
        self.sessions.set(user_id, to, patch).await;
        log_flow_transition(user_id, &format!("{:?}", from.state), &format!("{to:?}"));
    }

    /// Ends the flow after input that cannot be recovered from.
    async fn abort(&self, user_id: i64, what: &str) -> Vec<Effect> {
        let error = FlowError::UserInput(what.to_string());
        log_flow_rejected(user_id, "calendar", &error.to_string());
        self.sessions.clear(user_id).await;
        vec![Effect::SendText(RESTART_MESSAGE.to_string())]
    }

    /// Answers an intent that does not fit the current state; the session is untouched.
    fn reject(user_id: i64, intent: &str, session: Option<&Session>) -> Vec<Effect> {
        let reason = match session {
            Some(s) => format!("unexpected in state {:?}", s.state),
            None => "no active flow".to_string(),
        };
        log_flow_rejected(user_id, intent, &reason);
        vec![Effect::SendText(RESTART_MESSAGE.to_string())]
    }

    fn is_picking_date(session: &Session) -> bool {
        matches!(
            session.state,
            FlowState::AwaitingStartDate | FlowState::AwaitingEndDate
        )
    }
}
