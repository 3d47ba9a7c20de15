use teloxide::prelude::*;

use crate::bot::commands::record::interpretation_text;
use crate::bot::effects::send_long_html;
use crate::bot::keyboards;
use crate::database::connection::DatabaseManager;
use crate::database::models::{NumberChoice, StatKind, TimeChoice, TimeChoiceWithRange};
use crate::services::subscription::SubscriptionGate;
use crate::utils::feedback::CommandFeedback;
use crate::utils::html::escape_html;
use crate::utils::logging::log_database_error;

pub const NOT_SUBSCRIBED: &str = "To use this command, subscribe to the bot's channels first.";

pub async fn handle_list(bot: Bot, msg: Message, gate: &SubscriptionGate) -> ResponseResult<()> {
    if gate.is_enabled() {
        let subscribed = match msg.from() {
            Some(user) => gate.is_subscribed(&bot, user.id).await,
            None => false,
        };
        if !subscribed {
            CommandFeedback::new(bot, msg.chat.id)
                .warning(NOT_SUBSCRIBED)
                .await?;
            return Ok(());
        }
    }

    bot.send_message(msg.chat.id, "Which meanings do you want to see?")
        .reply_markup(keyboards::list_menu())
        .await?;
    Ok(())
}

pub async fn send_interpretations(
    bot: Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    kind: StatKind,
) -> ResponseResult<()> {
    let text = match kind {
        StatKind::Time => TimeChoice::all_with_ranges(&db.pool)
            .await
            .map(|choices| render_time_list(&choices)),
        StatKind::Numbers => NumberChoice::all(&db.pool)
            .await
            .map(|choices| render_number_list(&choices)),
    };

    match text {
        Ok(text) => send_long_html(&bot, chat_id, &text).await?,
        Err(e) => {
            log_database_error("select", "choices", &e.to_string());
            CommandFeedback::new(bot, chat_id)
                .error("Could not load the meanings. Please try again.")
                .await?;
        }
    }
    Ok(())
}

/// Time meanings grouped under a bold header per time range.
pub fn render_time_list(choices: &[TimeChoiceWithRange]) -> String {
    let mut text = String::from("<b>Time meanings:</b>\n");
    let mut current_range: Option<&str> = None;

    for choice in choices {
        if current_range != Some(choice.time_range.as_str()) {
            text.push_str(&format!("\n<b>{}</b>\n", escape_html(&choice.time_range)));
            current_range = Some(choice.time_range.as_str());
        }
        text.push_str(&interpretation_text(&choice.choice, &choice.interpretation));
        text.push('\n');
    }

    text.trim_end().to_string()
}

pub fn render_number_list(choices: &[NumberChoice]) -> String {
    let lines: Vec<String> = choices
        .iter()
        .map(|c| interpretation_text(&c.number.to_string(), &c.interpretation))
        .collect();
    format!("<b>Number meanings:</b>\n\n{}", lines.join("\n"))
}
