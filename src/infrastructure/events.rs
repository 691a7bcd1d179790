use crate::application::ports::events::ArticleEventPublisher;
use crate::domain::article::ArticleEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

const DEFAULT_CAPACITY: usize = 256;

/// Logs every event and fans it out to whoever subscribed. Events published
/// while nobody listens are dropped.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<ArticleEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArticleEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ArticleEventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: ArticleEvent) {
        info!(kind = event.kind(), draft_id = %event.draft_id(), "article event");
        if self.sender.send(event).is_err() {
            debug!("no event subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{ArticleId, LanguageCode};
    use chrono::Utc;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let publisher = BroadcastEventPublisher::default();
        let mut rx = publisher.subscribe();
        let event = ArticleEvent::Reverted {
            draft_id: ArticleId::new(4).unwrap(),
            language: LanguageCode::new("en").unwrap(),
            at: Utc::now(),
        };

        publisher.publish(event.clone());

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let publisher = BroadcastEventPublisher::new(1);
        publisher.publish(ArticleEvent::Deleted {
            draft_id: ArticleId::new(1).unwrap(),
            public_id: None,
            at: Utc::now(),
        });
    }
}
