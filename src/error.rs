use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rdkafka::error::KafkaError;
use thiserror::Error;

/// Failure to hand a message over to the broker.
///
/// Publishing is best-effort, so these are logged and never reach the client.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to publish to topic `{topic}`: {source}")]
    Publish {
        topic: String,
        #[source]
        source: KafkaError,
    },
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure while writing the audit row.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to open database connection: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("audit insert failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("database operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Rejected path parameters. Raised before any broker or database call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("topic is {len} bytes long, the limit is {max}")]
    TopicTooLong { len: usize, max: usize },
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, format!("invalid request: {self}")).into_response()
    }
}
