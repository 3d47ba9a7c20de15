use chrono::Utc;
use teloxide::prelude::*;

use crate::bot::callback_data::CallbackAction;
use crate::bot::commands::{list, record, stats};
use crate::bot::conversation::Intent;
use crate::bot::effects;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_callback;

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    let user_id = q.from.id.0 as i64;
    let username = q.from.username.clone();
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(user_id));
    let origin = q.message.as_ref().map(|m| m.id);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id)
            .text("Invalid callback data format")
            .await?;
        return Ok(());
    };

    log_callback(
        &data,
        username.as_deref().unwrap_or("unknown"),
        user_id,
        chat_id.0,
    );

    let action = CallbackAction::decode(&data);
    if let CallbackAction::Unknown(_) = action {
        bot.answer_callback_query(q.id)
            .text("This button is no longer supported")
            .await?;
        return Ok(());
    }
    bot.answer_callback_query(q.id).await?;

    let now = Utc::now().naive_utc();
    let intent = match action {
        CallbackAction::Calendar(raw) => Intent::CalendarToken(raw),
        CallbackAction::PickStatKind(kind) => Intent::PickStatKind(kind),
        CallbackAction::PickPredefinedRange(range) => Intent::PickPredefinedRange(range),
        CallbackAction::PickCustomCalendar => Intent::PickCustomCalendar,
        CallbackAction::OpenTimeRange(time_range_id) => {
            record::show_time_choices(bot, chat_id, &ctx.db, time_range_id).await?;
            return Ok(());
        }
        CallbackAction::RecordTime {
            time_range_id,
            choice_id,
        } => {
            record::record_time(
                bot,
                chat_id,
                &ctx.db,
                user_id,
                username,
                time_range_id,
                choice_id,
                now,
            )
            .await?;
            return Ok(());
        }
        CallbackAction::RecordNumber(number_choice_id) => {
            record::record_number(bot, chat_id, &ctx.db, user_id, username, number_choice_id, now)
                .await?;
            return Ok(());
        }
        CallbackAction::AddMore | CallbackAction::Back => {
            record::handle_time(bot, chat_id, &ctx.db).await?;
            return Ok(());
        }
        CallbackAction::AllTimeStats(kind) => {
            stats::send_all_time_stats(bot, chat_id, &ctx.reports, user_id, kind).await?;
            return Ok(());
        }
        CallbackAction::ListInterpretations(kind) => {
            if ctx.gate.is_enabled() && !ctx.gate.is_subscribed(&bot, q.from.id).await {
                CommandFeedback::new(bot, chat_id)
                    .warning(list::NOT_SUBSCRIBED)
                    .await?;
                return Ok(());
            }
            list::send_interpretations(bot, chat_id, &ctx.db, kind).await?;
            return Ok(());
        }
        CallbackAction::Unknown(_) => return Ok(()),
    };

    let effects = ctx.conversation.handle(user_id, intent, now).await;
    effects::apply(&bot, chat_id, origin, effects).await?;
    Ok(())
}
