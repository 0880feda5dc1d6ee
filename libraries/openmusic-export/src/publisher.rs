/// Producer side of the export queue
use crate::{error::QueueError, topology::QueueTopology};
use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, ConfirmSelectOptions},
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use openmusic_core::ExportJob;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{watch, Mutex};

/// Hands export jobs to the durable queue
#[async_trait]
pub trait JobPublisher: Send + Sync {
    /// Publish one job; returns once the broker has confirmed it
    async fn publish(&self, job: &ExportJob) -> Result<(), QueueError>;

    /// Broker link state, `None` when there is no broker behind this publisher
    fn link_state(&self) -> Option<LinkState> {
        None
    }
}

/// Publisher used when no broker is configured
pub struct UnconfiguredPublisher;

#[async_trait]
impl JobPublisher for UnconfiguredPublisher {
    async fn publish(&self, _job: &ExportJob) -> Result<(), QueueError> {
        Err(QueueError::NotConfigured)
    }
}

/// Observable connection state of an [`AmqpPublisher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkState {
    Disconnected,
    Connecting,
    Ready,
}

/// A connect attempt that failed, numbered by `AmqpPublisher::attempts`
struct ConnectFailure {
    attempt: u64,
    reason: String,
}

enum Link {
    Disconnected {
        /// `None` after a publish failure; only connect failures are shared
        failure: Option<ConnectFailure>,
    },
    Ready {
        // Dropping the connection closes the channel
        _connection: Connection,
        channel: Channel,
    },
}

/// Lazily connected AMQP publisher
///
/// The link sits behind an async mutex, which is the single-flight guard:
/// whoever holds it performs the connect while everyone else waits for the
/// result. A caller that waited behind a failed attempt gets that failure
/// instead of starting another connect, so a dead broker costs each request
/// at most one `connect_timeout`. Publishing, including the broker's confirm,
/// is bounded separately by `publish_timeout`.
pub struct AmqpPublisher {
    url: String,
    topology: QueueTopology,
    connect_timeout: Duration,
    publish_timeout: Duration,
    link: Mutex<Link>,
    attempts: AtomicU64,
    status: watch::Sender<LinkState>,
}

impl AmqpPublisher {
    pub fn new(url: impl Into<String>, topology: QueueTopology, connect_timeout: Duration) -> Self {
        let (status, _) = watch::channel(LinkState::Disconnected);
        Self {
            url: url.into(),
            topology,
            connect_timeout,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
            link: Mutex::new(Link::Disconnected { failure: None }),
            attempts: AtomicU64::new(0),
            status,
        }
    }

    /// Bound on one publish, from send to broker confirm
    #[must_use]
    pub fn with_publish_timeout(mut self, publish_timeout: Duration) -> Self {
        self.publish_timeout = publish_timeout;
        self
    }

    pub fn status(&self) -> LinkState {
        *self.status.borrow()
    }

    async fn channel(&self) -> Result<Channel, QueueError> {
        let seen = self.attempts.load(Ordering::Acquire);
        let mut link = self.link.lock().await;

        match &*link {
            Link::Ready { channel, .. } if channel.status().connected() => {
                return Ok(channel.clone());
            }
            // A connect that started after we arrived already failed
            Link::Disconnected {
                failure: Some(failure),
            } if failure.attempt > seen => {
                return Err(QueueError::Unreachable(failure.reason.clone()));
            }
            _ => {}
        }

        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
        self.status.send_replace(LinkState::Connecting);
        let result = within(self.connect_timeout, self.open()).await;

        match result {
            Ok((connection, channel)) => {
                tracing::info!(queue = %self.topology.queue, "Connected to export broker");
                *link = Link::Ready {
                    _connection: connection,
                    channel: channel.clone(),
                };
                self.status.send_replace(LinkState::Ready);
                Ok(channel)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Export broker connect failed");
                *link = Link::Disconnected {
                    failure: Some(ConnectFailure {
                        attempt,
                        reason: e.to_string(),
                    }),
                };
                self.status.send_replace(LinkState::Disconnected);
                Err(e)
            }
        }
    }

    async fn open(&self) -> Result<(Connection, Channel), QueueError> {
        let connection = Connection::connect(&self.url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        self.topology.declare(&channel).await?;
        Ok((connection, channel))
    }

    /// Forget the current link so the next publish reconnects
    async fn reset(&self) {
        *self.link.lock().await = Link::Disconnected { failure: None };
        self.status.send_replace(LinkState::Disconnected);
    }
}

const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a broker operation with a deadline
async fn within<T, F>(limit: Duration, operation: F) -> Result<T, QueueError>
where
    F: Future<Output = Result<T, QueueError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .unwrap_or(Err(QueueError::Timeout(limit)))
}

#[async_trait]
impl JobPublisher for AmqpPublisher {
    async fn publish(&self, job: &ExportJob) -> Result<(), QueueError> {
        let payload = job
            .to_bytes()
            .map_err(|e| QueueError::Encode(e.to_string()))?;
        let channel = self.channel().await?;

        let properties = BasicProperties::default()
            .with_delivery_mode(2)
            .with_content_type("application/json".into());

        let confirmed = within(self.publish_timeout, async {
            let confirmation = channel
                .basic_publish(
                    "",
                    &self.topology.queue,
                    BasicPublishOptions::default(),
                    &payload,
                    properties,
                )
                .await?
                .await?;
            if confirmation.is_nack() {
                return Err(QueueError::Unreachable("broker refused the job".into()));
            }
            Ok::<(), QueueError>(())
        })
        .await;

        if let Err(e) = &confirmed {
            tracing::warn!(error = %e, playlist_id = %job.playlist_id, "Publish failed, dropping broker link");
            self.reset().await;
        } else {
            tracing::debug!(playlist_id = %job.playlist_id, "Export job published");
        }

        confirmed
    }

    fn link_state(&self) -> Option<LinkState> {
        Some(self.status())
    }
}
