//! Store and connection configuration.

use std::time::Duration;

/// Configuration for a [`crate::Rediso`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of every key rediso writes.
    pub namespace: String,

    /// Suffix appended to the namespace to form the system table.
    pub system_suffix: String,

    /// Settings used when opening the session.
    pub connection: ConnectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "rediso".to_string(),
            system_suffix: "_sys".to_string(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the system table suffix.
    #[must_use]
    pub fn system_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.system_suffix = suffix.into();
        self
    }

    /// Sets the connection settings.
    #[must_use]
    pub fn connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }
}

/// Connection settings for the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Password; empty skips authentication.
    pub password: String,
    /// Logical database index.
    pub database: u32,
    /// Connect timeout.
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: String::new(),
            database: 0,
            timeout: Duration::from_secs(3),
        }
    }
}

impl ConnectionConfig {
    /// Creates connection settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the database index.
    #[must_use]
    pub const fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.namespace, "rediso");
        assert_eq!(config.system_suffix, "_sys");
        assert_eq!(config.connection.address(), "127.0.0.1:6379");
        assert_eq!(config.connection.database, 0);
        assert!(config.connection.password.is_empty());
        assert_eq!(config.connection.timeout, Duration::from_secs(3));
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().namespace("app").connection(
            ConnectionConfig::new()
                .with_host("cache.local")
                .with_port(6380)
                .with_password("MySuperPassw0rD")
                .with_database(3),
        );

        assert_eq!(config.namespace, "app");
        assert_eq!(config.connection.address(), "cache.local:6380");
        assert_eq!(config.connection.database, 3);
        assert_eq!(config.connection.password, "MySuperPassw0rD");
    }
}
