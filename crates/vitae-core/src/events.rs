use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

pub const RESUME_PARSED: &str = "resume.parsed";
pub const RESUME_DELETED: &str = "resume.deleted";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Channel closed")]
    Closed,
    #[error("Publish failed: {0}")]
    Failed(String),
}

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub topic: String,
    pub payload: serde_json::Value,
    pub published_at: DateTime<Utc>,
}

impl Event {
    #[must_use]
    pub fn new(topic: &str, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.to_string(),
            payload,
            published_at: Utc::now(),
        }
    }
}

/// Fire-and-forget announcement of resume lifecycle events.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> PublishResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _topic: &str, _payload: serde_json::Value) -> PublishResult<()> {
        Ok(())
    }
}

/// Writes each event to the log instead of a broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> PublishResult<()> {
        tracing::info!(topic, %payload, "event published");
        Ok(())
    }
}

/// Hands events to an in-process receiver.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelPublisher {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl EventPublisher for ChannelPublisher {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> PublishResult<()> {
        self.tx
            .send(Event::new(topic, payload))
            .map_err(|_| PublishError::Closed)
    }
}
