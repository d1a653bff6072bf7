//! Connection factory for a running `MySQL` server.
//!
//! Configuration is layered with Figment: built-in defaults, then an optional
//! YAML file, then `USER_REPO_DB_*` environment variables.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

/// Prefix of the environment variables overriding [`ClientConfig`] fields.
pub const ENV_PREFIX: &str = "USER_REPO_DB_";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid connection parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to create MySQL client ({dsn}): {source}")]
    Connect {
        dsn: String,
        #[source]
        source: DbErr,
    },
}

/// Where and how to reach the `MySQL` server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Pool size; the driver default applies when unset.
    pub max_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 3306,
            user: "root".to_owned(),
            password: String::new(),
            database: "practice".to_owned(),
            max_connections: None,
            connect_timeout_secs: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults merged with `USER_REPO_DB_*` environment variables.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load from defaults and the environment.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if a value has the wrong type or an
    /// unknown key is present.
    pub fn load() -> Result<Self, ClientError> {
        Ok(Self::figment().extract()?)
    }

    /// Load from defaults, then `path` (YAML), then the environment.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if the file cannot be parsed or holds
    /// invalid values.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Ok(figment.extract()?)
    }

    /// Same configuration pointed at another port on the same host.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `mysql://` URL for the driver, credentials percent-encoded.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidParameter`] if the host or credentials
    /// cannot be represented in a URL.
    pub fn dsn(&self) -> Result<String, ClientError> {
        let mut url = Url::parse(&format!("mysql://{}:{}", self.host, self.port))
            .map_err(|e| ClientError::InvalidParameter(format!("host '{}': {e}", self.host)))?;
        url.set_username(&self.user)
            .map_err(|()| ClientError::InvalidParameter(format!("user '{}'", self.user)))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| ClientError::InvalidParameter("password".to_owned()))?;
        }
        url.set_path(&format!("/{}", self.database));
        Ok(url.into())
    }

    /// DSN safe for logs and error messages.
    #[must_use]
    pub fn redacted_dsn(&self) -> String {
        format!(
            "mysql://{}:<redacted>@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }

    fn connect_options(&self) -> Result<ConnectOptions, ClientError> {
        let mut opts = ConnectOptions::new(self.dsn()?);
        opts.sqlx_logging(false);
        if let Some(max) = self.max_connections {
            opts.max_connections(max);
        }
        if let Some(secs) = self.connect_timeout_secs {
            opts.connect_timeout(Duration::from_secs(secs));
        }
        Ok(opts)
    }
}

/// Open a connection pool to the configured server.
///
/// # Errors
/// Returns [`ClientError::InvalidParameter`] for an unusable configuration
/// and [`ClientError::Connect`] if the server cannot be reached.
pub async fn connect(cfg: &ClientConfig) -> Result<DatabaseConnection, ClientError> {
    let dsn = cfg.redacted_dsn();
    info!(dsn = %dsn, "Connecting to MySQL");

    let conn = Database::connect(cfg.connect_options()?)
        .await
        .map_err(|source| {
            error!(dsn = %dsn, error = %source, "MySQL connection failed");
            ClientError::Connect { dsn, source }
        })?;

    info!("MySQL connection established");
    Ok(conn)
}
