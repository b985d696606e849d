//! Delivers one notification to every configured channel.
//!
//! Channels are tried in order. Individual channel failures don't block
//! other channels.

use crate::traits::{DispatchResult, Notification, Notifier, NotifyError};

pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn add_channel(&mut self, channel: Box<dyn Notifier>) {
        self.channels.push(channel);
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.channel_name()).collect()
    }

    /// Deliver `notification` to all channels, one result per channel.
    pub async fn dispatch(&self, notification: &Notification) -> Vec<DispatchResult> {
        if self.channels.is_empty() {
            tracing::debug!("No notification channels configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::info!(
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }

    /// Send a test notification to the channel at `channel_index`.
    pub async fn test_notify(&self, channel_index: usize) -> Result<(), NotifyError> {
        let channel = self.channels.get(channel_index).ok_or_else(|| {
            NotifyError::Config(format!("Channel index {channel_index} out of range"))
        })?;

        channel.test().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn mock(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Box<dyn Notifier> {
        Box::new(MockNotifier {
            name: name.to_string(),
            send_count: count.clone(),
            should_fail,
        })
    }

    fn notification() -> Notification {
        Notification {
            subject: "test".to_string(),
            body: "test body".to_string(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn dispatch_to_all_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            mock("a", &count_a, false),
            mock("b", &count_b, false),
        ]);

        let results = dispatcher.dispatch(&notification()).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn partial_failure_doesnt_block() {
        let count = Arc::new(AtomicUsize::new(0));

        let mut dispatcher = Dispatcher::empty();
        dispatcher.add_channel(mock("fail", &Arc::new(AtomicUsize::new(0)), true));
        dispatcher.add_channel(mock("ok", &count, false));

        let results = dispatcher.dispatch(&notification()).await;
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert_eq!(results[0].error.as_deref(), Some("Configuration error: mock failure"));
        assert!(results[1].success);
        assert_eq!(count.load(Ordering::SeqCst), 1); // second channel still sent
    }

    #[tokio::test]
    async fn empty_dispatcher_returns_nothing() {
        let dispatcher = Dispatcher::empty();
        assert!(dispatcher.is_empty());
        assert!(dispatcher.dispatch(&notification()).await.is_empty());
    }

    #[tokio::test]
    async fn test_notify_by_index() {
        let count = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(vec![mock("a", &count, false)]);

        dispatcher.test_notify(0).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(dispatcher.test_notify(3).await.is_err());
        assert_eq!(dispatcher.channel_names(), vec!["a"]);
    }
}
