use chrono::Utc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{list, record, start, stats, Command};
use crate::bot::conversation::Intent;
use crate::bot::effects;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::utils::logging::log_command_start;

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, ctx: BotContext) -> HandlerResult {
    let chat_id = msg.chat.id;
    let (user_id, username) = match msg.from() {
        Some(user) => (user.id.0 as i64, user.username.clone()),
        None => (chat_id.0, None),
    };
    log_command_start(
        &format!("{cmd:?}"),
        username.as_deref().unwrap_or("unknown"),
        user_id,
        chat_id.0,
    );

    match cmd {
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => start::handle_start(bot, msg, &ctx.db).await?,
        Command::Time => record::handle_time(bot, chat_id, &ctx.db).await?,
        Command::Numbers => record::handle_numbers(bot, chat_id, &ctx.db).await?,
        Command::Stat => stats::handle_stat(bot, chat_id).await?,
        Command::List => list::handle_list(bot, msg, &ctx.gate).await?,
        Command::StatRange => {
            let effects = ctx
                .conversation
                .handle(user_id, Intent::StartRangedStats, Utc::now().naive_utc())
                .await;
            effects::apply(&bot, chat_id, None, effects).await?;
        }
        Command::Cancel => {
            let effects = ctx
                .conversation
                .handle(user_id, Intent::Cancel, Utc::now().naive_utc())
                .await;
            effects::apply(&bot, chat_id, None, effects).await?;
        }
    }
    Ok(())
}
