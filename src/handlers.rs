use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{typed_header::TypedHeaderRejection, TypedHeader};
use axum_macros::debug_handler;
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::error::{BrokerError, DatabaseError};
use crate::models::{AppState, PublishRequest, TopicRecord, ANONYMOUS_OWNER};
use crate::principal::PrincipalId;
use crate::views::View;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /:topic/:message`: publishes `message` to `topic` and records the
/// attempt in the audit table.
#[debug_handler]
pub async fn publish(
    State(state): State<AppState>,
    principal: Result<TypedHeader<PrincipalId>, TypedHeaderRejection>,
    Path((topic, message)): Path<(String, String)>,
) -> Response {
    let owner_id = resolve_owner(principal);

    let request = match PublishRequest::parse(topic, message, owner_id, state.max_topic_len) {
        Ok(request) => request,
        Err(e) => {
            info!(error = %e, "rejected publish request");
            return e.into_response();
        }
    };

    let span = info_span!("publish", topic = %request.topic, owner_id = request.owner_id);
    publish_and_record(&state, request).instrument(span).await
}

fn resolve_owner(principal: Result<TypedHeader<PrincipalId>, TypedHeaderRejection>) -> i64 {
    match principal {
        Ok(TypedHeader(PrincipalId(pid))) => pid,
        Err(rejection) if rejection.is_missing() => ANONYMOUS_OWNER,
        Err(rejection) => {
            warn!(error = %rejection, "ignoring malformed principal header");
            ANONYMOUS_OWNER
        }
    }
}

async fn publish_and_record(state: &AppState, request: PublishRequest) -> Response {
    spawn_publish(state, &request);

    let record = TopicRecord::from(&request);
    let view = match record_publish(state, &record).await {
        Ok(()) => {
            info!("publish recorded");
            View::PubComplete
        }
        Err(e) => {
            error!(error = %e, "failed to record publish");
            View::Error
        }
    };

    view.render(&request.topic, &request.message)
}

/// Publishes in the background. The outcome is logged and never gates the response.
fn spawn_publish(state: &AppState, request: &PublishRequest) {
    let broker = Arc::clone(&state.broker);
    let publish_timeout = state.publish_timeout;
    let topic = request.topic.clone();
    let payload = request.message.clone();

    tokio::spawn(
        async move {
            let outcome = match timeout(publish_timeout, broker.publish(&topic, &payload)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(BrokerError::Timeout(publish_timeout)),
            };

            match outcome {
                Ok(()) => debug!("message published"),
                Err(e) => warn!(error = %e, "broker publish failed"),
            }
        }
        .in_current_span(),
    );
}

/// Writes one audit row on a dedicated connection. The connection is closed
/// exactly once whenever it was opened, whatever the insert outcome.
async fn record_publish(state: &AppState, record: &TopicRecord) -> Result<(), DatabaseError> {
    let db_timeout = state.db_timeout;

    let mut conn = timeout(db_timeout, state.store.connect())
        .await
        .map_err(|_| DatabaseError::Timeout(db_timeout))??;

    let inserted = match timeout(db_timeout, conn.insert(record)).await {
        Ok(inserted) => inserted,
        Err(_) => Err(DatabaseError::Timeout(db_timeout)),
    };

    conn.close().await;
    inserted
}
