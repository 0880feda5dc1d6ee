/// Server configuration
use crate::error::{Result, ServerError};
use openmusic_export::QueueTopology;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_cache")]
    pub cache: CacheSettings,

    #[serde(default = "default_export")]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Unset runs the cache local-only
    pub redis_url: Option<String>,

    #[serde(default = "default_cache_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    #[serde(default = "default_local_capacity")]
    pub local_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Unset makes every export request fail as unavailable
    pub amqp_url: Option<String>,

    #[serde(default = "default_queue")]
    pub queue: String,

    #[serde(default = "default_dead_letter_queue")]
    pub dead_letter_queue: String,

    #[serde(default = "default_export_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Bound on one publish, including the broker's confirm
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,
}

impl CacheSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.local_capacity)
            .ok_or_else(|| ServerError::Config("cache.local_capacity must be positive".to_string()))
    }
}

impl ExportSettings {
    pub fn topology(&self) -> QueueTopology {
        QueueTopology {
            queue: self.queue.clone(),
            dead_letter_queue: self.dead_letter_queue.clone(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `config.toml` in the working directory and may be
    /// absent. Environment variables override it, e.g.
    /// `OPENMUSIC_AUTH__JWT_SECRET` sets `auth.jwt_secret`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("OPENMUSIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set OPENMUSIC_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.auth.jwt_expiration_hours) {
            return Err(ServerError::Config(format!(
                "auth.jwt_expiration_hours must be between 1 and {}",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }

        self.cache.capacity()?;

        for (name, value) in [
            ("cache.connect_timeout_ms", self.cache.connect_timeout_ms),
            ("cache.probe_interval_secs", self.cache.probe_interval_secs),
            ("export.connect_timeout_ms", self.export.connect_timeout_ms),
            ("export.publish_timeout_ms", self.export.publish_timeout_ms),
        ] {
            if value == 0 {
                return Err(ServerError::Config(format!("{} must be positive", name)));
            }
        }

        if self.export.queue.is_empty() || self.export.dead_letter_queue.is_empty() {
            return Err(ServerError::Config("export queue names must not be empty".to_string()));
        }

        if self.export.queue == self.export.dead_letter_queue {
            return Err(ServerError::Config(
                "export.queue and export.dead_letter_queue must differ".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/openmusic.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_cache() -> CacheSettings {
    CacheSettings {
        redis_url: None,
        connect_timeout_ms: default_cache_connect_timeout_ms(),
        probe_interval_secs: default_probe_interval_secs(),
        local_capacity: default_local_capacity(),
    }
}

fn default_cache_connect_timeout_ms() -> u64 {
    500
}

fn default_probe_interval_secs() -> u64 {
    30
}

fn default_local_capacity() -> usize {
    10_000
}

fn default_export() -> ExportSettings {
    ExportSettings {
        amqp_url: None,
        queue: default_queue(),
        dead_letter_queue: default_dead_letter_queue(),
        connect_timeout_ms: default_export_connect_timeout_ms(),
        publish_timeout_ms: default_publish_timeout_ms(),
    }
}

fn default_queue() -> String {
    QueueTopology::default().queue
}

fn default_dead_letter_queue() -> String {
    QueueTopology::default().dead_letter_queue
}

fn default_export_connect_timeout_ms() -> u64 {
    2000
}

fn default_publish_timeout_ms() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            cache: default_cache(),
            export: default_export(),
        }
    }
}
