/// Worker configuration
use anyhow::{bail, Context, Result};
use openmusic_export::{QueueTopology, SmtpSettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_queue_settings")]
    pub queue: QueueSettings,

    #[serde(default = "default_smtp")]
    pub smtp: SmtpSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    #[serde(default = "default_amqp_url")]
    pub amqp_url: String,

    #[serde(default = "default_queue")]
    pub queue: String,

    #[serde(default = "default_dead_letter_queue")]
    pub dead_letter_queue: String,

    /// Unacknowledged deliveries the broker may push ahead
    #[serde(default = "default_prefetch")]
    pub prefetch: u16,

    #[serde(default = "default_connect_retry_secs")]
    pub connect_retry_secs: u64,
}

impl QueueSettings {
    pub fn topology(&self) -> QueueTopology {
        QueueTopology {
            queue: self.queue.clone(),
            dead_letter_queue: self.dead_letter_queue.clone(),
        }
    }

    pub fn connect_retry(&self) -> Duration {
        Duration::from_secs(self.connect_retry_secs)
    }
}

impl WorkerConfig {
    /// Load from an optional file plus `OPENMUSIC_`-prefixed environment
    /// variables, e.g. `OPENMUSIC_SMTP__HOST`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("worker.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("OPENMUSIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .context("Failed to read worker configuration")?
            .try_deserialize()
            .context("Invalid worker configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue.prefetch == 0 {
            bail!("queue.prefetch must be positive");
        }
        if self.queue.queue == self.queue.dead_letter_queue {
            bail!("queue.queue and queue.dead_letter_queue must differ");
        }
        if self.smtp.host.trim().is_empty() {
            bail!("smtp.host must not be empty");
        }
        Ok(())
    }
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/openmusic.db".to_string()
}

fn default_queue_settings() -> QueueSettings {
    QueueSettings {
        amqp_url: default_amqp_url(),
        queue: default_queue(),
        dead_letter_queue: default_dead_letter_queue(),
        prefetch: default_prefetch(),
        connect_retry_secs: default_connect_retry_secs(),
    }
}

fn default_amqp_url() -> String {
    "amqp://127.0.0.1:5672/%2f".to_string()
}

fn default_queue() -> String {
    QueueTopology::default().queue
}

fn default_dead_letter_queue() -> String {
    QueueTopology::default().dead_letter_queue
}

fn default_prefetch() -> u16 {
    1
}

fn default_connect_retry_secs() -> u64 {
    5
}

fn default_smtp() -> SmtpSettings {
    SmtpSettings {
        host: "localhost".to_string(),
        port: 1025,
        username: None,
        password: None,
        from: "OpenMusic <noreply@openmusic.local>".to_string(),
        starttls: false,
    }
}
