//! PushPlus notifier.
//!
//! Delivers notifications through the PushPlus `send` endpoint, which
//! forwards them to WeChat. The provider answers HTTP 200 with a JSON
//! envelope; only `code == 200` inside that envelope means delivered.

use std::time::Duration;

use serde::Deserialize;

use crate::env::resolve_env_vars;
use crate::traits::{Notification, Notifier, NotifyError};

/// Sends notifications via PushPlus.
#[derive(Debug)]
pub struct PushPlusNotifier {
    url: String,
    token: String,
    /// Group topic; `None` sends to the token owner.
    topic: Option<String>,
    /// Content template understood by PushPlus (`html`, `markdown`, `txt`).
    template: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PushPlusResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

impl PushPlusNotifier {
    /// Creates a notifier from configuration values.
    ///
    /// `token` may be a `${VAR}` reference. Returns [`NotifyError::Config`]
    /// if the token is empty or references a missing env var.
    pub fn from_config(
        url: String,
        token: String,
        topic: Option<String>,
        template: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let token = resolve_env_vars(&token)?;
        if token.trim().is_empty() {
            return Err(NotifyError::Config(
                "PushPlus token must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url,
            token,
            topic: topic.filter(|t| !t.is_empty()),
            template,
            client,
        })
    }

    /// JSON body for one message.
    fn payload(&self, notification: &Notification) -> serde_json::Value {
        let mut body = serde_json::json!({
            "token": self.token,
            "title": notification.subject,
            "content": notification.body,
            "template": self.template,
        });
        if let Some(ref topic) = self.topic {
            body["topic"] = serde_json::Value::String(topic.clone());
        }
        body
    }
}

#[async_trait::async_trait]
impl Notifier for PushPlusNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(
            url = %self.url,
            topic = ?self.topic,
            title = %notification.subject,
            "Sending PushPlus notification"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(%status, body = %body_text, "PushPlus returned non-2xx status");
            return Err(NotifyError::Rejected {
                code: i64::from(status.as_u16()),
                msg: body_text,
            });
        }

        let reply: PushPlusResponse = response.json().await?;
        if reply.code == 200 {
            tracing::info!(title = %notification.subject, "PushPlus notification sent");
            return Ok(());
        }

        Err(NotifyError::Rejected {
            code: reply.code,
            msg: reply.msg.unwrap_or_else(|| "未知错误".to_string()),
        })
    }

    fn channel_name(&self) -> &str {
        "pushplus"
    }
}
