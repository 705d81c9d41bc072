//! Kafka-backed shared topic (`kafka` feature).

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    Message,
    config::ClientConfig,
    consumer::{Consumer, StreamConsumer},
    producer::{FutureProducer, FutureRecord},
    util::Timeout,
};
use tracing::info;

use super::{Subscription, Transport, TransportError};
use crate::config::TrackerConfig;

/// Publishes through a shared producer and opens one consumer per
/// subscription attempt.
pub struct KafkaTransport {
    producer: FutureProducer,
    consumer_config: ClientConfig,
    topic: String,
    delivery_timeout: Duration,
}

impl KafkaTransport {
    /// Build the producer and consumer settings from `config`.
    ///
    /// Fails with [`TransportError::Unavailable`] when no broker is configured
    /// or the client library rejects the settings.
    pub fn new(config: &TrackerConfig) -> Result<Self, TransportError> {
        if !config.is_enabled() {
            return Err(TransportError::Unavailable(
                "no brokers configured".to_string(),
            ));
        }
        let servers = config.bootstrap_servers();

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &servers)
            .set(
                "message.timeout.ms",
                config.ack_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        let mut consumer_config = ClientConfig::new();
        consumer_config
            .set("bootstrap.servers", &servers)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", config.offset_reset.as_ref())
            .set("enable.auto.commit", "true");

        info!(
            brokers = %servers,
            topic = %config.topic,
            group_id = %config.group_id,
            "Kafka transport configured"
        );

        Ok(Self {
            producer,
            consumer_config,
            topic: config.topic.clone(),
            delivery_timeout: config.ack_timeout,
        })
    }
}

#[async_trait]
impl Transport for KafkaTransport {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), TransportError> {
        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        self.producer
            .send(record, Timeout::After(self.delivery_timeout))
            .await
            .map(|_| ())
            .map_err(|(error, _message)| TransportError::Publish(error.to_string()))
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError> {
        let consumer: StreamConsumer = self
            .consumer_config
            .create()
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        consumer
            .subscribe(&[&self.topic])
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        // Fail fast on unreachable brokers instead of reporting ready.
        let topic = self.topic.clone();
        let consumer = tokio::task::spawn_blocking(move || {
            consumer
                .fetch_metadata(Some(topic.as_str()), Duration::from_secs(5))
                .map(|_| consumer)
        })
        .await
        .map_err(|e| TransportError::Subscribe(e.to_string()))?
        .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        Ok(Box::new(KafkaSubscription { consumer }))
    }
}

struct KafkaSubscription {
    consumer: StreamConsumer,
}

#[async_trait]
impl Subscription for KafkaSubscription {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| TransportError::Receive(e.to_string()))?;

        Ok(message.payload().map(<[u8]>::to_vec).unwrap_or_default())
    }
}
