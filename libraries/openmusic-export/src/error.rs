/// Queue and mail errors
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// No broker URL configured
    #[error("Export queue is not configured")]
    NotConfigured,

    /// Connecting to the broker exceeded its time budget
    #[error("Broker connect timed out after {0:?}")]
    Timeout(Duration),

    /// A connect attempt made while this caller waited has already failed
    #[error("Broker unreachable: {0}")]
    Unreachable(String),

    /// Job could not be encoded
    #[error("Failed to encode export job: {0}")]
    Encode(String),

    /// Error reported by the AMQP client
    #[error(transparent)]
    Amqp(#[from] lapin::Error),
}

#[derive(Error, Debug)]
pub enum MailError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// Relay refused the message permanently
    #[error("Mail rejected: {0}")]
    Rejected(String),

    /// Relay unreachable or temporarily refusing
    #[error("Mail transport error: {0}")]
    Transport(String),
}

impl MailError {
    /// Whether sending the same message again cannot succeed
    pub fn is_permanent(&self) -> bool {
        !matches!(self, MailError::Transport(_))
    }
}
