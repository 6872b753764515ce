use crate::config::MailerSettings;
use matchminder_domain::EmailAddress;
use serde_json::json;

/// Deployment-wide transactional mail sender, the fallback for email
/// reminders that are not tied to an individual user's mailbox
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> anyhow::Result<()>;
}

pub struct HttpMailer {
    settings: Option<MailerSettings>,
    http: reqwest::Client,
}

impl HttpMailer {
    pub fn new(settings: Option<MailerSettings>) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl IMailer for HttpMailer {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> anyhow::Result<()> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| anyhow::Error::msg("Transactional mailer is not configured"))?;

        let res = self
            .http
            .post(&settings.api_url)
            .bearer_auth(&settings.api_key)
            .json(&json!({
                "from": settings.sender,
                "to": to.as_str(),
                "subject": subject,
                "html": html_body,
                "text": text_body,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow::anyhow!(
                "Mail provider rejected the message: {}",
                res.status()
            ));
        }
        Ok(())
    }
}
