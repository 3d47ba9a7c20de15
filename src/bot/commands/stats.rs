use teloxide::prelude::*;

use crate::bot::conversation::USER_NOT_FOUND_MESSAGE;
use crate::bot::effects::send_long_html;
use crate::bot::keyboards;
use crate::database::models::StatKind;
use crate::error::FlowError;
use crate::services::report::{ReportScope, StatsReportBuilder};
use crate::utils::feedback::CommandFeedback;

pub async fn handle_stat(bot: Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, "Which statistics do you want to see?")
        .reply_markup(keyboards::all_stat_menu())
        .await?;
    Ok(())
}

/// Sends the all-time report of `kind` for the user with Telegram id `tg_id`.
pub async fn send_all_time_stats(
    bot: Bot,
    chat_id: ChatId,
    reports: &StatsReportBuilder,
    tg_id: i64,
    kind: StatKind,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match reports.build(tg_id, ReportScope::AllTime, kind).await {
        Ok(text) => send_long_html(&bot, chat_id, &text).await?,
        Err(FlowError::NotFound(_)) => {
            feedback.info(USER_NOT_FOUND_MESSAGE).await?;
        }
        Err(e) => {
            tracing::error!("Failed to build all-time {} stats for {}: {}", kind.as_str(), tg_id, e);
            feedback
                .validation_error(
                    "Failed to load your statistics",
                    "Try the same button again in a moment.",
                )
                .await?;
        }
    }
    Ok(())
}
