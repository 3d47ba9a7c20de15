pub mod callback;
pub mod general_message;
pub mod message;

use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::Command;
use crate::bot::conversation::ConversationController;
use crate::database::connection::DatabaseManager;
use crate::services::report::StatsReportBuilder;
use crate::services::subscription::SubscriptionGate;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Everything a handler needs, cheap to clone per update.
#[derive(Clone)]
pub struct BotContext {
    pub db: DatabaseManager,
    pub conversation: Arc<ConversationController>,
    pub reports: Arc<StatsReportBuilder>,
    pub gate: SubscriptionGate,
}

pub struct BotHandler {
    pub context: BotContext,
}

impl BotHandler {
    pub fn new(context: BotContext) -> Self {
        Self { context }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let ctx_command = self.context.clone();
        let ctx_callback = self.context.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx_command.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(|bot: Bot, msg: Message| async move {
                general_message::handle_general_message(bot, msg).await
            }))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: CallbackQuery| {
                    let ctx = ctx_callback.clone();
                    async move { callback::callback_handler(bot, q, ctx).await }
                },
            ))
    }
}
