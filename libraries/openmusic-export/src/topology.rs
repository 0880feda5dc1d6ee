/// Queue names and declaration shared by producer and consumer
use lapin::{
    options::QueueDeclareOptions,
    types::{AMQPValue, FieldTable},
    Channel,
};
use serde::{Deserialize, Serialize};

/// Durable export queue and its dead-letter queue
///
/// Producer and consumer must declare the queue with identical arguments or
/// the broker refuses the second declaration, so both go through
/// [`declare`](Self::declare).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTopology {
    pub queue: String,
    pub dead_letter_queue: String,
}

impl Default for QueueTopology {
    fn default() -> Self {
        Self {
            queue: "export:playlists".to_string(),
            dead_letter_queue: "export:playlists.dead-letter".to_string(),
        }
    }
}

impl QueueTopology {
    /// Arguments routing rejected messages to the dead-letter queue
    pub fn queue_arguments(&self) -> FieldTable {
        let mut args = FieldTable::default();
        args.insert(
            "x-dead-letter-exchange".into(),
            AMQPValue::LongString("".into()),
        );
        args.insert(
            "x-dead-letter-routing-key".into(),
            AMQPValue::LongString(self.dead_letter_queue.as_str().into()),
        );
        args
    }

    /// Declare both queues as durable (they survive a broker restart)
    pub async fn declare(&self, channel: &Channel) -> Result<(), lapin::Error> {
        let durable = QueueDeclareOptions {
            durable: true,
            ..QueueDeclareOptions::default()
        };

        channel
            .queue_declare(&self.dead_letter_queue, durable, FieldTable::default())
            .await?;
        channel
            .queue_declare(&self.queue, durable, self.queue_arguments())
            .await?;

        Ok(())
    }
}
