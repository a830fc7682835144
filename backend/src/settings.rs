//! Startup configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `DARPAN_*` environment variables, and
//! configuration files, then validated once into immutable settings that the
//! rest of the process consumes.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "darpan_db";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;

/// Raw configuration values as supplied by the operator.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DARPAN")]
pub struct AppSettings {
    /// Database host name or address.
    pub db_host: Option<String>,
    /// Database TCP port.
    pub db_port: Option<u16>,
    /// Database role used by the service.
    pub db_user: Option<String>,
    /// Password for `db_user`.
    pub db_password: Option<String>,
    /// Database name.
    pub db_name: Option<String>,
    /// Upper bound on pooled connections.
    pub db_pool_max_size: Option<u32>,
    /// Idle connections the pool tries to keep open.
    pub db_pool_min_idle: Option<u32>,
    /// Seconds to wait when checking out a connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// Interface the HTTP listener binds to.
    pub bind_host: Option<String>,
    /// Port the HTTP listener binds to.
    pub bind_port: Option<u16>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &self.db_password.as_ref().map(|_| "<redacted>"))
            .field("db_name", &self.db_name)
            .field("db_pool_max_size", &self.db_pool_max_size)
            .field("db_pool_min_idle", &self.db_pool_min_idle)
            .field("db_connect_timeout_secs", &self.db_connect_timeout_secs)
            .field("bind_host", &self.bind_host)
            .field("bind_port", &self.bind_port)
            .finish()
    }
}

/// Errors raised while validating [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required value is absent or blank.
    #[error("missing required configuration value: {name}")]
    Missing { name: &'static str },
    /// A value is present but unusable.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection parameters for the relational store.
///
/// The connection URL embeds the password, so it is wiped from memory when the
/// settings are dropped and never appears in `Debug` output.
#[derive(Clone)]
pub struct DatabaseSettings {
    host: String,
    port: u16,
    user: String,
    name: String,
    url: Zeroizing<String>,
    pool_max_size: u32,
    pool_min_idle: Option<u32>,
    connect_timeout: Duration,
}

impl DatabaseSettings {
    /// Database host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Database TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database role.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of pooled connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }

    /// Idle connections kept open, if any.
    pub fn pool_min_idle(&self) -> Option<u32> {
        self.pool_min_idle
    }

    /// Connection checkout timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// The `postgres://` connection URL with percent-encoded credentials.
    pub fn database_url(&self) -> Zeroizing<String> {
        self.url.clone()
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("url", &"<redacted>")
            .field("name", &self.name)
            .field("pool_max_size", &self.pool_max_size)
            .field("pool_min_idle", &self.pool_min_idle)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Fully validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    /// Database connection parameters.
    pub database: DatabaseSettings,
    /// Socket address for the HTTP listener.
    pub bind_addr: SocketAddr,
}

impl AppSettings {
    /// Validate raw values and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the database user or password
    /// is absent or blank. Returns [`SettingsError::Invalid`] for a zero pool
    /// size, an idle floor above the pool size, a database host that cannot
    /// appear in a URL, or an unparsable bind host.
    pub fn validate(&self) -> Result<ValidatedSettings, SettingsError> {
        let user = required(self.db_user.as_deref(), "DARPAN_DB_USER")?;
        let password = required_secret(self.db_password.as_deref(), "DARPAN_DB_PASSWORD")?;

        let pool_max_size = self.db_pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        if pool_max_size == 0 {
            return Err(SettingsError::Invalid {
                name: "DARPAN_DB_POOL_MAX_SIZE",
                reason: "must be at least 1".to_owned(),
            });
        }

        let pool_min_idle = self.db_pool_min_idle;
        if pool_min_idle.is_some_and(|min_idle| min_idle > pool_max_size) {
            return Err(SettingsError::Invalid {
                name: "DARPAN_DB_POOL_MIN_IDLE",
                reason: format!("must not exceed the pool size of {pool_max_size}"),
            });
        }

        let bind_host = non_blank_or(self.bind_host.as_deref(), DEFAULT_BIND_HOST);
        let bind_ip: IpAddr = bind_host.parse().map_err(|err| SettingsError::Invalid {
            name: "DARPAN_BIND_HOST",
            reason: format!("{bind_host}: {err}"),
        })?;

        let host = non_blank_or(self.db_host.as_deref(), DEFAULT_DB_HOST);
        let port = self.db_port.unwrap_or(DEFAULT_DB_PORT);
        let name = non_blank_or(self.db_name.as_deref(), DEFAULT_DB_NAME);
        let url = postgres_url(host, port, user, password, name)?;

        let database = DatabaseSettings {
            host: host.to_owned(),
            port,
            user: user.to_owned(),
            name: name.to_owned(),
            url,
            pool_max_size,
            pool_min_idle,
            connect_timeout: Duration::from_secs(
                self.db_connect_timeout_secs
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
        };

        Ok(ValidatedSettings {
            database,
            bind_addr: SocketAddr::new(bind_ip, self.bind_port.unwrap_or(DEFAULT_BIND_PORT)),
        })
    }
}

/// Assemble the connection URL; `Url` percent-encodes the userinfo and path.
fn postgres_url(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    name: &str,
) -> Result<Zeroizing<String>, SettingsError> {
    let invalid_host = |reason: String| SettingsError::Invalid {
        name: "DARPAN_DB_HOST",
        reason,
    };

    let mut url =
        Url::parse("postgres://localhost").map_err(|err| invalid_host(err.to_string()))?;
    url.set_host(Some(host))
        .map_err(|err| invalid_host(format!("{host}: {err}")))?;
    // These setters only fail for URLs without a host, which was set above.
    url.set_port(Some(port))
        .map_err(|()| invalid_host(format!("{host}: cannot carry a port")))?;
    url.set_username(user)
        .map_err(|()| invalid_host(format!("{host}: cannot carry credentials")))?;
    url.set_password(Some(password))
        .map_err(|()| invalid_host(format!("{host}: cannot carry credentials")))?;
    url.path_segments_mut()
        .map_err(|()| invalid_host(format!("{host}: cannot carry a database name")))?
        .clear()
        .push(name);

    Ok(Zeroizing::new(url.into()))
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(SettingsError::Missing { name }),
    }
}

/// Like [`required`], but keeps surrounding whitespace, which may be part of a secret.
fn required_secret<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, SettingsError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw),
        _ => Err(SettingsError::Missing { name }),
    }
}

fn non_blank_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => fallback,
    }
}
