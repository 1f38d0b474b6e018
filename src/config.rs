use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Environment variable naming an extra configuration file.
pub const CONFIG_FILE_ENV: &str = "PUB_RECORDER_CONFIG";

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub database: DatabaseSettings,
    pub limits: LimitSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Kafka producer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    pub bootstrap_servers: String,
    pub client_id: String,
    pub publish_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitSettings {
    pub max_topic_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            broker: BrokerSettings {
                bootstrap_servers: "localhost:29092".to_string(),
                client_id: "pub-recorder".to_string(),
                publish_timeout_ms: 1000,
            },
            database: DatabaseSettings {
                url: "mysql://root@localhost:3306/pubsub".to_string(),
                timeout_ms: 3000,
            },
            limits: LimitSettings {
                // Kafka rejects topic names longer than this.
                max_topic_len: 249,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Loads settings from, in increasing priority: built-in defaults,
    /// `config/default.*`, the file named by `PUB_RECORDER_CONFIG` and
    /// `PUB_RECORDER_<SECTION>__<KEY>` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false));

        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            builder = builder.add_source(File::with_name(&path));
        }

        builder
            .add_source(
                Environment::with_prefix("PUB_RECORDER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl BrokerSettings {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

impl DatabaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
