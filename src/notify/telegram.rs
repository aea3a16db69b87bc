use async_trait::async_trait;
use log::info;
use teloxide::prelude::{ChatId, Requester};
use teloxide::Bot;

use crate::error::{Error, Result};
use crate::notify::{Notifier, Tone};

/// Push channel backed by a Telegram bot.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Validates the bot token eagerly; an invalid credential aborts startup
    /// rather than surfacing on the first grade of the run.
    pub async fn connect(token: &str, chat_id: i64) -> Result<Self> {
        let bot = Bot::new(token);
        bot.get_me()
            .await
            .map_err(|e| Error::Delivery(format!("telegram rejected the bot token: {e}")))?;
        Ok(Self { bot, chat_id: ChatId(chat_id) })
    }

    fn message(description: &str, grade: f32) -> String {
        let emoji = match Tone::classify(grade) {
            Tone::Negative => "😬",
            Tone::Neutral => "🙂",
            Tone::Positive => "🚀",
        };
        format!("📚 New grade published!\n{emoji} {description}: {grade}")
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, description: &str, grade: f32) -> Result<()> {
        let sent = self
            .bot
            .send_message(self.chat_id, Self::message(description, grade))
            .await
            .map_err(|e| Error::Delivery(format!("telegram send failed: {e}")))?;
        info!("Telegram message sent successfully {:?}", sent.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_the_tone_emoji() {
        assert!(TelegramNotifier::message("Analysis", 5.5).contains('🚀'));
        assert!(TelegramNotifier::message("Analysis", 4.5).contains('🙂'));
        assert!(TelegramNotifier::message("Analysis", 3.0).contains('😬'));
    }
}
