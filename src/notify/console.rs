use async_trait::async_trait;
use log::info;

use crate::error::Result;
use crate::notify::{Notifier, Tone};

/// Logs the alert to the terminal. Always succeeds; also what dry runs use.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, description: &str, grade: f32) -> Result<()> {
        let tone = Tone::classify(grade);
        info!("{} {} - {}", tone.headline(), description, grade);
        Ok(())
    }
}
