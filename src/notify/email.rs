use async_trait::async_trait;
use log::info;
use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::notify::{Notifier, Tone};

/// Email channel backed by an HTTP mail API (Mailgun-style form endpoint
/// with API-key basic auth).
pub struct EmailNotifier {
    client: Client,
    endpoint: Url,
    api_key: String,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(endpoint: Url, api_key: String, from: String, to: String) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, endpoint, api_key, from, to })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, description: &str, grade: f32) -> Result<()> {
        let tone = Tone::classify(grade);
        let subject = format!("{} New grade for {}", tone.headline(), description);
        let body = format!("{description} - {grade}");

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", self.from.as_str()),
                ("to", self.to.as_str()),
                ("subject", subject.as_str()),
                ("text", body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("mail transport failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Delivery(format!(
                "mail API answered {} for {description:?}",
                response.status()
            )));
        }
        info!("Email sent for {description:?}");
        Ok(())
    }
}
