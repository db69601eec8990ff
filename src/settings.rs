use std::{io, net::IpAddr, path::Path, str::FromStr, time::Duration};

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use sqlx::postgres::PgConnectOptions;

#[derive(Deserialize)]
pub struct Settings {
    pub address: IpAddr,
    pub port: u16,
    pub log: LogSettings,
    pub database: DatabaseSettings,
    pub queue: QueueSettings,
}

#[serde_as]
#[derive(Deserialize)]
pub struct LogSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub level: tracing::Level,
    pub endpoint: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    /// Overrides the database named in `url`.
    pub db_name: Option<String>,
    pub create_schema: bool,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

#[derive(Deserialize)]
pub struct QueueSettings {
    pub url: Option<Secret<String>>,
    pub name: String,
}

impl Settings {
    /// Layers defaults, the optional TOML file, `DATACHECK__*` variables and
    /// finally the plain `DATABASE_URL`/`RABBITMQ_URL` variables.
    pub fn load(filename: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = defaults()?;

        if let Some(filename) = filename {
            config = config.add_source(File::new(filename, FileFormat::Toml).required(true))
        }

        config = config.add_source(
            Environment::with_prefix("DATACHECK")
                .separator("__")
                .prefix_separator("__"),
        );

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config = config.set_override("database.url", url)?;
        }
        if let Ok(url) = std::env::var("RABBITMQ_URL") {
            config = config.set_override("queue.url", url)?;
        }

        config.build()?.try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("address", "127.0.0.1")?
        .set_default("port", "50010")?
        .set_default("log.level", "info")?
        .set_default("database.create_schema", "true")?
        .set_default("database.connect_timeout", "5s")?
        .set_default("queue.name", "data_queue")
}

/// Exports the variables of a dotenv file into the process environment.
/// Returns `false` when the file does not exist; a malformed file is an error.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = self.connect_options_without_db()?;
        Ok(match &self.db_name {
            Some(db_name) => options.database(db_name),
            None => options,
        })
    }

    pub fn connect_options_without_db(&self) -> Result<PgConnectOptions, sqlx::Error> {
        PgConnectOptions::from_str(self.url.expose_secret())
    }
}
