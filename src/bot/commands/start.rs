use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::database::{connection::DatabaseManager, repository::StatsRepository};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_database_error;

pub const WELCOME_TEXT: &str = "This bot helps you keep track of the signs of the Universe.\n\n\
<b>Every time you notice a time or a combination of digits, it is a hint.</b>\n\
If the same time keeps catching your eye, at least three times, the hint could not be clearer.\n\n\
<b>Commands</b>\n\
/time - record a time sign\n\
/numbers - record a number sign\n\
/stat - your statistics of all time\n\
/stat_range - your statistics for a period\n\
/list - every sign with its meaning";

pub async fn handle_start(bot: Bot, msg: Message, db: &DatabaseManager) -> ResponseResult<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };

    if let Err(e) = db.get_or_create_user(from.id.0 as i64, from.username.clone()).await {
        log_database_error("get_or_create", "users", &e.to_string());
        CommandFeedback::new(bot, msg.chat.id)
            .error("Could not register you right now. Please try /start again.")
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
