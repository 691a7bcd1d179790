// tests/support/fakes.rs
use chrono::{DateTime, Duration, Utc};
use cms_articles::application::ports::{events::ArticleEventPublisher, time::Clock};
use cms_articles::domain::article::ArticleEvent;
use once_cell::sync::Lazy;
use std::sync::Mutex;

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2024-03-15T09:00:00Z")
        .expect("invalid RFC3339 in tests/support/fakes.rs")
        .with_timezone(&Utc)
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

/// Clock the tests move by hand.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(fixed_now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Keeps every published event in order.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ArticleEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ArticleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl ArticleEventPublisher for RecordingPublisher {
    fn publish(&self, event: ArticleEvent) {
        self.events.lock().unwrap().push(event);
    }
}
