use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::utils::feedback::CommandFeedback;

/// Answers plain messages that are not known commands.
pub async fn handle_general_message(bot: Bot, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let feedback = CommandFeedback::new(bot, msg.chat.id);

    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        feedback
            .validation_error(
                &format!("Unknown command: {command}"),
                "Use /help to see all available commands.",
            )
            .await?;
    } else if text.to_lowercase().contains("help") {
        feedback
            .info("Use /help to see all available commands.")
            .await?;
    }
    // Other messages are ignored to avoid spam

    Ok(())
}
