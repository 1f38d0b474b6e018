use async_trait::async_trait;
use sqlx::{mysql::MySqlConnectOptions, Connection, MySqlConnection};
use tracing::warn;

use crate::error::DatabaseError;
use crate::models::TopicRecord;

const INSERT_TOPIC_RECORD: &str =
    "INSERT INTO topic_table (owner_id, id, content) VALUES (?, ?, ?)";

/// Opens request-scoped connections to the audit table.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn AuditConnection>, DatabaseError>;
}

/// A single open connection. Callers must `close` it once they are done.
#[async_trait]
pub trait AuditConnection: Send {
    async fn insert(&mut self, record: &TopicRecord) -> Result<(), DatabaseError>;

    async fn close(self: Box<Self>);
}

/// MySQL store that opens a fresh connection for every request.
pub struct MySqlAuditStore {
    options: MySqlConnectOptions,
}

impl MySqlAuditStore {
    pub fn from_url(url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            options: url.parse()?,
        })
    }
}

#[async_trait]
impl AuditStore for MySqlAuditStore {
    async fn connect(&self) -> Result<Box<dyn AuditConnection>, DatabaseError> {
        let conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(DatabaseError::Connect)?;
        Ok(Box::new(MySqlAuditConnection { conn }))
    }
}

struct MySqlAuditConnection {
    conn: MySqlConnection,
}

#[async_trait]
impl AuditConnection for MySqlAuditConnection {
    async fn insert(&mut self, record: &TopicRecord) -> Result<(), DatabaseError> {
        sqlx::query(INSERT_TOPIC_RECORD)
            .bind(record.owner_id)
            .bind(&record.topic)
            .bind(&record.content)
            .execute(&mut self.conn)
            .await
            .map_err(DatabaseError::Query)?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        let Self { conn } = *self;
        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close database connection cleanly");
        }
    }
}
