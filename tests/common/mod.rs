#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use pub_recorder::{
    app,
    config::Settings,
    error::{BrokerError, DatabaseError},
    models::{AppState, TopicRecord},
    producer::Broker,
    store::{AuditConnection, AuditStore},
};
use rdkafka::{error::KafkaError, types::RDKafkaErrorCode};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tower::ServiceExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerMode {
    Ok,
    Fails,
    Hangs,
    Panics,
}

/// Broker that reports every publish call on a channel.
pub struct FakeBroker {
    calls: UnboundedSender<(String, String)>,
    mode: BrokerMode,
}

#[async_trait]
impl Broker for FakeBroker {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        let _ = self.calls.send((topic.to_string(), payload.to_string()));
        match self.mode {
            BrokerMode::Ok => Ok(()),
            BrokerMode::Fails => Err(BrokerError::Publish {
                topic: topic.to_string(),
                source: KafkaError::MessageProduction(RDKafkaErrorCode::BrokerNotAvailable),
            }),
            BrokerMode::Hangs => std::future::pending().await,
            BrokerMode::Panics => panic!("broker client blew up"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Ok,
    ConnectFails,
    ConnectHangs,
    InsertFails,
    InsertHangs,
}

/// In-memory audit store counting connection lifecycle events.
#[derive(Clone)]
pub struct FakeStore {
    mode: StoreMode,
    pub rows: Arc<Mutex<Vec<TopicRecord>>>,
    pub connects: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn new(mode: StoreMode) -> Self {
        Self {
            mode,
            rows: Arc::default(),
            connects: Arc::default(),
            closes: Arc::default(),
        }
    }

    pub fn rows(&self) -> Vec<TopicRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditStore for FakeStore {
    async fn connect(&self) -> Result<Box<dyn AuditConnection>, DatabaseError> {
        match self.mode {
            StoreMode::ConnectFails => {
                return Err(DatabaseError::Connect(sqlx::Error::Protocol(
                    "connection refused".into(),
                )));
            }
            StoreMode::ConnectHangs => std::future::pending::<()>().await,
            _ => {}
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            store: self.clone(),
        }))
    }
}

struct FakeConnection {
    store: FakeStore,
}

#[async_trait]
impl AuditConnection for FakeConnection {
    async fn insert(&mut self, record: &TopicRecord) -> Result<(), DatabaseError> {
        match self.store.mode {
            StoreMode::InsertFails => Err(DatabaseError::Query(sqlx::Error::Protocol(
                "table topic_table doesn't exist".into(),
            ))),
            StoreMode::InsertHangs => std::future::pending().await,
            _ => {
                self.store.rows.lock().unwrap().push(record.clone());
                Ok(())
            }
        }
    }

    async fn close(self: Box<Self>) {
        self.store.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub app: Router,
    pub store: FakeStore,
    pub published: UnboundedReceiver<(String, String)>,
}

impl Harness {
    pub fn new(mode: StoreMode) -> Self {
        Self::with_broker(BrokerMode::Ok, mode)
    }

    pub fn with_broker(broker_mode: BrokerMode, mode: StoreMode) -> Self {
        let (calls, published) = unbounded_channel();
        let store = FakeStore::new(mode);

        let mut settings = Settings::default();
        settings.database.timeout_ms = 100;
        settings.broker.publish_timeout_ms = 100;

        let state = AppState::new(
            Arc::new(FakeBroker {
                calls,
                mode: broker_mode,
            }),
            Arc::new(store.clone()),
            &settings,
        );

        Self {
            app: app(state),
            store,
            published,
        }
    }

    pub async fn get(&self, uri: &str, principal: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(pid) = principal {
            request = request.header("x-principal-id", pid);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Next publish call made by the handler, waiting for the background task.
    pub async fn next_publish(&mut self) -> Option<(String, String)> {
        tokio::time::timeout(Duration::from_secs(1), self.published.recv())
            .await
            .ok()
            .flatten()
    }

    /// True when no publish call is pending right now.
    pub async fn no_publish(&mut self) -> bool {
        tokio::task::yield_now().await;
        self.published.try_recv().is_err()
    }
}
