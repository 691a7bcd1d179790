use crate::domain::article::events::ArticleEvent;

pub trait ArticleEventPublisher: Send + Sync {
    fn publish(&self, event: ArticleEvent);
}
