/// Consumer side of the export queue
use crate::{
    error::QueueError,
    mail::MailTransport,
    processor::{ExportProcessor, Outcome, SnapshotSource},
    topology::QueueTopology,
};
use futures_util::StreamExt;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, BasicRejectOptions},
    types::FieldTable,
    Channel, Connection, ConnectionProperties,
};
use std::time::Duration;

/// How a delivery is settled with the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    /// Negative-ack and put back on the queue
    Requeue,
    /// Reject without requeue; the broker dead-letters it
    DeadLetter,
}

impl Disposition {
    /// Settle an outcome; a retryable failure gets exactly one redelivery
    pub fn for_outcome(outcome: &Outcome, redelivered: bool) -> Self {
        match outcome {
            Outcome::Delivered => Self::Ack,
            Outcome::Retry(_) if !redelivered => Self::Requeue,
            Outcome::Retry(_) | Outcome::DeadLetter(_) => Self::DeadLetter,
        }
    }
}

/// Connect to the broker, retrying every `retry_every` until it answers
///
/// Only used at worker startup; the request path never retries.
pub async fn connect_with_retry(url: &str, retry_every: Duration) -> Connection {
    loop {
        match Connection::connect(url, ConnectionProperties::default()).await {
            Ok(connection) => {
                tracing::info!("Connected to export broker");
                return connection;
            }
            Err(e) => {
                tracing::warn!(error = %e, retry_in = ?retry_every, "Broker not reachable, retrying");
                tokio::time::sleep(retry_every).await;
            }
        }
    }
}

/// Consume export jobs until the channel closes
///
/// Each delivery is processed to completion and settled before the next
/// one is taken; `prefetch` bounds how many the broker pushes ahead.
pub async fn consume<S, M>(
    channel: &Channel,
    topology: &QueueTopology,
    processor: &ExportProcessor<S, M>,
    prefetch: u16,
) -> Result<(), QueueError>
where
    S: SnapshotSource,
    M: MailTransport,
{
    topology.declare(channel).await?;
    channel
        .basic_qos(prefetch, BasicQosOptions::default())
        .await?;

    let mut deliveries = channel
        .basic_consume(
            &topology.queue,
            "openmusic-export-worker",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    tracing::info!(queue = %topology.queue, prefetch, "Consuming export jobs");

    while let Some(delivery) = deliveries.next().await {
        let delivery = delivery?;
        let outcome = processor.process(&delivery.data).await;
        let disposition = Disposition::for_outcome(&outcome, delivery.redelivered);

        tracing::debug!(delivery_tag = delivery.delivery_tag, ?disposition, "Settling delivery");

        match disposition {
            Disposition::Ack => {
                delivery.ack(BasicAckOptions::default()).await?;
            }
            Disposition::Requeue => {
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..BasicNackOptions::default()
                    })
                    .await?;
            }
            Disposition::DeadLetter => {
                delivery
                    .reject(BasicRejectOptions { requeue: false })
                    .await?;
            }
        }
    }

    tracing::warn!("Export delivery stream ended");
    Ok(())
}
