//! Recording of time and number signs.
//!
//! `/time` opens the time ranges, a range opens its choices, and a choice is
//! stored as a submission. `/numbers` goes straight to the number buttons.

use chrono::NaiveDateTime;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::keyboards;
use crate::database::connection::DatabaseManager;
use crate::database::models::{NumberChoice, NumberSelection, TimeChoice, TimeRange, TimeSelection};
use crate::database::repository::StatsRepository;
use crate::utils::feedback::CommandFeedback;
use crate::utils::html::escape_html;
use crate::utils::logging::log_database_error;

const LOAD_FAILED: &str = "Could not load the choices. Please try again.";
const SAVE_FAILED: &str = "Could not save your sign. Please try again.";

/// Sends the time range buttons. Also the target of "Add more" and "Back".
pub async fn handle_time(bot: Bot, chat_id: ChatId, db: &DatabaseManager) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match TimeRange::all(&db.pool).await {
        Ok(ranges) if ranges.is_empty() => {
            feedback.warning("No time ranges found.").await?;
        }
        Ok(ranges) => {
            bot.send_message(chat_id, "Choose a time range:")
                .reply_markup(keyboards::time_ranges(&ranges))
                .await?;
        }
        Err(e) => {
            log_database_error("select", "time_ranges", &e.to_string());
            feedback.error(LOAD_FAILED).await?;
        }
    }
    Ok(())
}

pub async fn show_time_choices(
    bot: Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    time_range_id: i64,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match TimeChoice::find_by_range(&db.pool, time_range_id).await {
        Ok(choices) if choices.is_empty() => {
            feedback.warning("No times found for this range.").await?;
        }
        Ok(choices) => {
            bot.send_message(chat_id, "Choose the time you saw:")
                .reply_markup(keyboards::time_choices(&choices))
                .await?;
        }
        Err(e) => {
            log_database_error("select", "time_choices", &e.to_string());
            feedback.error(LOAD_FAILED).await?;
        }
    }
    Ok(())
}

pub async fn handle_numbers(bot: Bot, chat_id: ChatId, db: &DatabaseManager) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    match NumberChoice::all(&db.pool).await {
        Ok(choices) if choices.is_empty() => {
            feedback.warning("No numbers found.").await?;
        }
        Ok(choices) => {
            bot.send_message(chat_id, "Choose the number you saw:")
                .reply_markup(keyboards::number_choices(&choices))
                .await?;
        }
        Err(e) => {
            log_database_error("select", "numbers_choices", &e.to_string());
            feedback.error(LOAD_FAILED).await?;
        }
    }
    Ok(())
}

/// Stores a time submission and answers with its interpretation.
#[allow(clippy::too_many_arguments)]
pub async fn record_time(
    bot: Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    tg_id: i64,
    username: Option<String>,
    time_range_id: i64,
    choice_id: i64,
    now: NaiveDateTime,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    let choice = match TimeChoice::find_by_id(&db.pool, choice_id).await {
        Ok(Some(choice)) if choice.time_range_id == time_range_id => choice,
        Ok(_) => {
            feedback.warning("This time is not available.").await?;
            return Ok(());
        }
        Err(e) => {
            log_database_error("select", "time_choices", &e.to_string());
            feedback.error(SAVE_FAILED).await?;
            return Ok(());
        }
    };

    let saved = async {
        let user = db.get_or_create_user(tg_id, username).await?;
        TimeSelection::create(&db.pool, user.id, choice.id, now).await
    }
    .await;

    if let Err(e) = saved {
        log_database_error("insert", "time_selections", &e.to_string());
        feedback.error(SAVE_FAILED).await?;
        return Ok(());
    }

    tracing::info!("User {} recorded time {}", tg_id, choice.choice);
    bot.send_message(chat_id, interpretation_text(&choice.choice, &choice.interpretation))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::add_more())
        .await?;
    Ok(())
}

/// Stores a number submission and answers with its interpretation.
pub async fn record_number(
    bot: Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    tg_id: i64,
    username: Option<String>,
    number_choice_id: i64,
    now: NaiveDateTime,
) -> ResponseResult<()> {
    let feedback = CommandFeedback::new(bot.clone(), chat_id);

    let choice = match NumberChoice::find_by_id(&db.pool, number_choice_id).await {
        Ok(Some(choice)) => choice,
        Ok(None) => {
            feedback.warning("This number is not available.").await?;
            return Ok(());
        }
        Err(e) => {
            log_database_error("select", "numbers_choices", &e.to_string());
            feedback.error(SAVE_FAILED).await?;
            return Ok(());
        }
    };

    let saved = async {
        let user = db.get_or_create_user(tg_id, username).await?;
        NumberSelection::create(&db.pool, user.id, choice.id, now).await
    }
    .await;

    if let Err(e) = saved {
        log_database_error("insert", "number_selections", &e.to_string());
        feedback.error(SAVE_FAILED).await?;
        return Ok(());
    }

    tracing::info!("User {} recorded number {}", tg_id, choice.number);
    bot.send_message(
        chat_id,
        interpretation_text(&choice.number.to_string(), &choice.interpretation),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

/// `<b>label</b>: interpretation`, escaped for HTML.
pub fn interpretation_text(label: &str, interpretation: &str) -> String {
    format!("<b>{}</b>: {}", escape_html(label), escape_html(interpretation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_text() {
        assert_eq!(
            interpretation_text("11:11", "A door is open"),
            "<b>11:11</b>: A door is open"
        );
        assert_eq!(interpretation_text("<1>", "a & b"), "<b>&lt;1&gt;</b>: a &amp; b");
    }
}
