use teloxide::prelude::*;
use teloxide::types::UserId;

/// Gate requiring membership in a fixed set of channels.
///
/// With no channels configured every user passes.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionGate {
    channels: Vec<ChatId>,
}

impl SubscriptionGate {
    pub fn new(channel_ids: &[i64]) -> Self {
        Self {
            channels: channel_ids.iter().copied().map(ChatId).collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Whether `user_id` is present in every configured channel.
    ///
    /// A failed lookup counts as not subscribed.
    pub async fn is_subscribed(&self, bot: &Bot, user_id: UserId) -> bool {
        for channel in &self.channels {
            match bot.get_chat_member(*channel, user_id).await {
                Ok(member) if member.kind.is_present() => {}
                Ok(_) => return false,
                Err(e) => {
                    tracing::warn!(
                        "Subscription check for user {} in channel {} failed: {}",
                        user_id.0,
                        channel.0,
                        e
                    );
                    return false;
                }
            }
        }
        true
    }
}
