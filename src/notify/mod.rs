mod console;
mod email;
mod telegram;

use async_trait::async_trait;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

use crate::config::NotifierConfig;
use crate::error::Result;

/// Delivers a human-readable alert for one published grade.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, description: &str, grade: f32) -> Result<()>;
}

/// How a grade reads on the 1.0–6.0 scale: failing, solid, or excellent.
/// The 5.0 boundary is inclusive on the positive side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Negative,
    Neutral,
    Positive,
}

impl Tone {
    pub fn classify(grade: f32) -> Self {
        if grade < 4.0 {
            Tone::Negative
        } else if grade >= 5.0 {
            Tone::Positive
        } else {
            Tone::Neutral
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Tone::Negative => "NAY!",
            Tone::Neutral => "YAY!",
            Tone::Positive => "WOW!",
        }
    }
}

/// Builds the configured notifier. Channels that carry a credential validate
/// it here, so a bad token aborts startup instead of failing mid-run.
pub async fn build(config: &NotifierConfig) -> Result<Box<dyn Notifier>> {
    Ok(match config {
        NotifierConfig::Console => Box::new(ConsoleNotifier),
        NotifierConfig::Telegram { token, chat_id } => {
            Box::new(TelegramNotifier::connect(token, *chat_id).await?)
        }
        NotifierConfig::Email { endpoint, api_key, from, to } => Box::new(EmailNotifier::new(
            endpoint.clone(),
            api_key.clone(),
            from.clone(),
            to.clone(),
        )?),
    })
}
