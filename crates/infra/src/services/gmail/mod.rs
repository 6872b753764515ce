use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::json;

const GMAIL_SEND_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Submits raw MIME messages to the per-user mailbox send API
#[async_trait::async_trait]
pub trait IMailApi: Send + Sync {
    async fn send_raw(&self, access_token: &str, raw_message: &str) -> anyhow::Result<()>;
}

pub struct GmailApi {
    http: reqwest::Client,
}

impl GmailApi {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for GmailApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailApi for GmailApi {
    async fn send_raw(&self, access_token: &str, raw_message: &str) -> anyhow::Result<()> {
        let res = self
            .http
            .post(GMAIL_SEND_ENDPOINT)
            .bearer_auth(access_token)
            .json(&json!({ "raw": raw_message }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(anyhow::anyhow!(
                "Mail API rejected the message: {}",
                res.status()
            ));
        }
        Ok(())
    }
}

/// Builds the raw MIME envelope the mailbox send API expects:
/// CRLF-separated headers and html body, base64url-encoded without
/// padding. The subject is B-encoded so non-ascii matchups survive.
pub fn encode_raw_message(from: &str, to: &str, subject: &str, html_body: &str) -> String {
    let encoded_subject = format!("=?utf-8?B?{}?=", STANDARD.encode(subject));
    let message = [
        format!("From: {}", from),
        format!("To: {}", to),
        format!("Subject: {}", encoded_subject),
        "MIME-Version: 1.0".to_string(),
        "Content-Type: text/html; charset=utf-8".to_string(),
        String::new(),
        html_body.to_string(),
    ]
    .join("\r\n");

    URL_SAFE_NO_PAD.encode(message)
}
