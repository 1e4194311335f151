use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Named notification channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Something changed in a watched directory
    WatchEventTriggered,
    /// A downloaded filter overwrote the selected filter file
    FilterFileReplaced,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::WatchEventTriggered => "watch_event_triggered",
            Channel::FilterFileReplaced => "filter_file_replaced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel: Channel,
    /// File the notification is about, when known
    pub file_name: Option<String>,
}

impl Notification {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            file_name: None,
        }
    }

    pub fn about(channel: Channel, file_name: impl Into<String>) -> Self {
        Self {
            channel,
            file_name: Some(file_name.into()),
        }
    }
}

/// Receiving end of one channel subscription
pub struct Subscription {
    channel: Channel,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Next pending notification, if any (never blocks)
    pub fn try_next(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }
}

type SubscriberTable = HashMap<Channel, Vec<mpsc::UnboundedSender<Notification>>>;

/// Fan-out of watcher notifications to subscribers
///
/// Cheap to clone; all clones share one subscriber table. Each subscription
/// receives every notification published after it was made, at most once.
#[derive(Clone, Default)]
pub struct NotificationHub {
    subscribers: Arc<Mutex<SubscriberTable>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, SubscriberTable> {
        // A panicking publisher cannot leave the table half-updated
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self, channel: Channel) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.table().entry(channel).or_default().push(tx);
        tracing::debug!("Subscribed to {}", channel.as_str());
        Subscription { channel, rx }
    }

    /// Drop every subscription on `channel`
    pub fn unsubscribe(&self, channel: Channel) {
        if let Some(senders) = self.table().remove(&channel) {
            tracing::debug!(
                "Unsubscribed {} listener(s) from {}",
                senders.len(),
                channel.as_str()
            );
        }
    }

    /// Deliver a notification to every live subscription on its channel
    ///
    /// Returns the number of subscriptions it reached.
    pub fn publish(&self, notification: Notification) -> usize {
        let mut table = self.table();
        let Some(senders) = table.get_mut(&notification.channel) else {
            tracing::trace!("No subscribers for {}", notification.channel.as_str());
            return 0;
        };

        senders.retain(|tx| tx.send(notification.clone()).is_ok());
        tracing::debug!(
            "Published {} ({:?}) to {} subscriber(s)",
            notification.channel.as_str(),
            notification.file_name,
            senders.len()
        );
        senders.len()
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.table().get(&channel).map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_channel_subscribers_only() {
        let hub = NotificationHub::new();
        let mut watch = hub.subscribe(Channel::WatchEventTriggered);
        let mut replaced = hub.subscribe(Channel::FilterFileReplaced);

        assert_eq!(hub.publish(Notification::new(Channel::WatchEventTriggered)), 1);

        assert_eq!(
            watch.try_next(),
            Some(Notification::new(Channel::WatchEventTriggered))
        );
        assert_eq!(watch.try_next(), None);
        assert_eq!(replaced.try_next(), None);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hub = NotificationHub::new();
        let mut sub = hub.subscribe(Channel::FilterFileReplaced);
        hub.unsubscribe(Channel::FilterFileReplaced);

        assert_eq!(hub.subscriber_count(Channel::FilterFileReplaced), 0);
        assert_eq!(hub.publish(Notification::about(Channel::FilterFileReplaced, "a.filter")), 0);
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_dropped_subscriptions_are_pruned() {
        let hub = NotificationHub::new();
        let sub = hub.subscribe(Channel::WatchEventTriggered);
        let _kept = hub.subscribe(Channel::WatchEventTriggered);
        drop(sub);

        assert_eq!(hub.publish(Notification::new(Channel::WatchEventTriggered)), 1);
        assert_eq!(hub.subscriber_count(Channel::WatchEventTriggered), 1);
    }

    #[tokio::test]
    async fn test_clones_share_subscribers() {
        let hub = NotificationHub::new();
        let publisher = hub.clone();
        let mut sub = hub.subscribe(Channel::WatchEventTriggered);

        publisher.publish(Notification::about(Channel::WatchEventTriggered, "x.filter"));

        let got = sub.next().await.unwrap();
        assert_eq!(got.file_name.as_deref(), Some("x.filter"));
    }
}
