use std::{sync::Arc, time::Duration};

use crate::config::Settings;
use crate::error::ValidationError;
use crate::producer::Broker;
use crate::store::AuditStore;

/// Owner recorded for requests without an authenticated principal.
pub const ANONYMOUS_OWNER: i64 = 0;

/// Process-wide collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn Broker>,
    pub store: Arc<dyn AuditStore>,
    pub publish_timeout: Duration,
    pub db_timeout: Duration,
    pub max_topic_len: usize,
}

impl AppState {
    pub fn new(broker: Arc<dyn Broker>, store: Arc<dyn AuditStore>, settings: &Settings) -> Self {
        Self {
            broker,
            store,
            publish_timeout: settings.broker.publish_timeout(),
            db_timeout: settings.database.timeout(),
            max_topic_len: settings.limits.max_topic_len,
        }
    }
}

/// A validated publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub topic: String,
    pub message: String,
    pub owner_id: i64,
}

impl PublishRequest {
    pub fn parse(
        topic: String,
        message: String,
        owner_id: i64,
        max_topic_len: usize,
    ) -> Result<Self, ValidationError> {
        if topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if topic.len() > max_topic_len {
            return Err(ValidationError::TopicTooLong {
                len: topic.len(),
                max: max_topic_len,
            });
        }

        Ok(Self {
            topic,
            message,
            owner_id,
        })
    }
}

/// Row appended to `topic_table` for every publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub owner_id: i64,
    pub topic: String,
    pub content: String,
}

impl From<&PublishRequest> for TopicRecord {
    fn from(request: &PublishRequest) -> Self {
        Self {
            owner_id: request.owner_id,
            topic: request.topic.clone(),
            content: request.message.clone(),
        }
    }
}
