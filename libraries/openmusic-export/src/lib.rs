//! OpenMusic Export
//!
//! Hand-off between the request-serving process and the export worker.
//! The two processes share nothing but a durable queue and the
//! [`ExportJob`](openmusic_core::ExportJob) wire format.
//!
//! # Producer side
//!
//! [`AmqpPublisher`] owns one lazily opened broker connection. Concurrent
//! callers share a single in-flight connect; connects are bounded by a
//! timeout and never retried on the request path.
//!
//! # Consumer side
//!
//! [`ExportProcessor`] turns one payload into an [`Outcome`];
//! [`consume`] settles each delivery from that outcome:
//!
//! | Outcome      | First delivery | Redelivery    |
//! |--------------|----------------|---------------|
//! | `Delivered`  | ack            | ack           |
//! | `Retry`      | nack + requeue | dead-letter   |
//! | `DeadLetter` | dead-letter    | dead-letter   |
//!
//! Dead-lettering rejects without requeue; the broker routes the message to
//! the queue named by [`QueueTopology::dead_letter_queue`].

mod consumer;
mod error;
mod mail;
mod processor;
mod publisher;
mod topology;

pub use consumer::{connect_with_retry, consume, Disposition};
pub use error::{MailError, QueueError};
pub use mail::{validate_email, ExportMail, MailTransport, SmtpMailer, SmtpSettings};
pub use processor::{ExportProcessor, Outcome, SnapshotSource};
pub use publisher::{AmqpPublisher, JobPublisher, LinkState, UnconfiguredPublisher};
pub use topology::QueueTopology;
