use anyhow::{Result, anyhow};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Client for a transactional email HTTP API.
///
/// The API receives `{from, to, subject, text}` as JSON with a bearer key.
pub struct MailClient {
    api_url: Url,
    api_key: String,
    from: String,
    client: Client,
}

impl MailClient {
    pub fn new(api_url: Url, api_key: String, from: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            api_url,
            api_key,
            from,
            client,
        })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("mail api returned {}: {}", status, body))
    }
}
