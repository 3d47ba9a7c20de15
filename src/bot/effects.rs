use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};

use crate::bot::conversation::Effect;
use crate::bot::keyboards;
use crate::utils::html::{split_message, MAX_MESSAGE_LENGTH};

/// Sends `text` as HTML, split into as many messages as Telegram requires.
pub async fn send_long_html(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    for chunk in split_message(text, MAX_MESSAGE_LENGTH) {
        bot.send_message(chat_id, chunk)
            .parse_mode(ParseMode::Html)
            .await?;
    }
    Ok(())
}

/// Applies conversation effects in order.
///
/// `origin` is the message whose button produced the effects; calendar edits
/// target it and fall back to a fresh calendar when there is none.
pub async fn apply(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    effects: Vec<Effect>,
) -> ResponseResult<()> {
    for effect in effects {
        match effect {
            Effect::PromptStatKind => {
                bot.send_message(chat_id, "Which statistics do you want to see?")
                    .reply_markup(keyboards::stat_kind_menu())
                    .await?;
            }
            Effect::PromptRange => {
                bot.send_message(chat_id, "Choose a period:")
                    .reply_markup(keyboards::range_menu())
                    .await?;
            }
            Effect::RenderCalendar {
                year,
                month,
                prompt,
            } => {
                bot.send_message(chat_id, prompt)
                    .reply_markup(keyboards::calendar(year, month))
                    .await?;
            }
            Effect::EditCalendar { year, month } => match origin {
                Some(message_id) => {
                    bot.edit_message_reply_markup(chat_id, message_id)
                        .reply_markup(keyboards::calendar(year, month))
                        .await?;
                }
                None => {
                    bot.send_message(chat_id, "Select a date:")
                        .reply_markup(keyboards::calendar(year, month))
                        .await?;
                }
            },
            Effect::SendText(text) => send_long_html(bot, chat_id, &text).await?,
        }
    }
    Ok(())
}
