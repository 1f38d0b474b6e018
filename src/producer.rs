use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    error::KafkaResult,
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
    ClientConfig,
};
use tracing::{debug, warn};

use crate::config::BrokerSettings;
use crate::error::BrokerError;

/// Publish side of a message broker.
#[async_trait]
pub trait Broker: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BrokerError>;
}

/// Kafka-backed broker sharing one producer across all requests.
pub struct KafkaBroker {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl KafkaBroker {
    pub fn create(settings: &BrokerSettings) -> KafkaResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &settings.bootstrap_servers)
            .set("client.id", &settings.client_id)
            .set("queue.buffering.max.ms", "0")
            .set(
                "message.timeout.ms",
                settings.publish_timeout_ms.to_string(),
            )
            .create()?;

        Ok(Self {
            producer,
            send_timeout: settings.publish_timeout(),
        })
    }

    /// Waits for in-flight messages before the process exits.
    pub fn flush(&self, timeout: Duration) {
        if let Err(e) = self.producer.flush(Timeout::After(timeout)) {
            warn!(error = %e, "failed to flush kafka producer");
        }
    }
}

#[async_trait]
impl Broker for KafkaBroker {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        let record: FutureRecord<'_, (), str> = FutureRecord::to(topic)
            .payload(payload)
            .timestamp(chrono::Utc::now().timestamp_millis());

        match self
            .producer
            .send(record, Timeout::After(self.send_timeout))
            .await
        {
            Ok((partition, offset)) => {
                debug!(topic, partition, offset, "message delivered");
                Ok(())
            }
            Err((e, _)) => Err(BrokerError::Publish {
                topic: topic.to_string(),
                source: e,
            }),
        }
    }
}
