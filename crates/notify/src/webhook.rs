//! Generic HTTP webhook notifier.
//!
//! Posts the rendered [`Notification`] as JSON to a configured URL, for
//! relaying the daily message into chat bots or home automation.

use std::collections::HashMap;
use std::time::Duration;

use crate::env::resolve_env_vars;
use crate::traits::{Notification, Notifier, NotifyError};

/// Delivers notifications as JSON over HTTP POST.
///
/// Environment variable references (`${VAR_NAME}`) in the URL and header
/// values are resolved at construction time.
#[derive(Debug)]
pub struct WebhookNotifier {
    /// Target URL (env vars already resolved).
    url: String,
    /// Custom headers to include on every request.
    headers: HashMap<String, String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a webhook notifier. Missing env vars produce [`NotifyError::Config`].
    pub fn from_config(
        url: &str,
        headers: Option<HashMap<String, String>>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let resolved_url = resolve_env_vars(url)?;
        if !resolved_url.starts_with("http://") && !resolved_url.starts_with("https://") {
            return Err(NotifyError::Config(format!(
                "webhook URL must be http(s): {resolved_url}"
            )));
        }

        let headers = headers.unwrap_or_default();
        let mut resolved_headers = HashMap::with_capacity(headers.len());
        for (key, value) in &headers {
            resolved_headers.insert(key.clone(), resolve_env_vars(value)?);
        }

        Ok(Self {
            url: resolved_url,
            headers: resolved_headers,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.url).json(notification);
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                body = %body_text,
                "webhook returned non-2xx status"
            );
            return Err(NotifyError::Rejected {
                code: i64::from(status.as_u16()),
                msg: body_text,
            });
        }

        tracing::debug!(url = %self.url, %status, "webhook notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}
