// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The remote key-value engine contract and its Redis implementation.

use std::fmt;
use std::time::Duration;

use cachegate_tier::Error;
use redis::AsyncCommands;

/// Contract for a remote, network-accessed key-value store.
///
/// Values are strings; binary content is encoded before it reaches the
/// store. Every operation may block on network I/O and is fallible;
/// timeouts are the client's concern, configured where the client is built.
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`, `None` when absent or expired.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Writes `value` under `key`. With a TTL the entry expires on its own;
    /// without one it lives until deleted.
    fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Deletes the given keys; absent keys are ignored.
    fn delete(&self, keys: &[String]) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes every key in the connected database.
    fn flush_all(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Connection settings for a standalone Redis server.
///
/// All parameters arrive through configuration and are validated once at
/// construction; nothing is read from the environment at call sites.
#[derive(Clone, serde::Deserialize)]
pub struct RedisSettings {
    /// Server hostname or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Optional AUTH password.
    pub password: Option<String>,
    /// Database index to select; defaults to 0.
    pub database: Option<i64>,
}

impl RedisSettings {
    /// Creates settings for an unauthenticated server.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            password: None,
            database: None,
        }
    }

    /// Sets the AUTH password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Selects a database index other than 0.
    #[must_use]
    pub fn with_database(mut self, database: i64) -> Self {
        self.database = Some(database);
        self
    }

    /// Checks the settings for values that cannot reach a server.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty host or a zero port.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.trim().is_empty() {
            return Err(Error::from_message("redis host must not be empty"));
        }
        if self.port == 0 {
            return Err(Error::from_message("redis port must not be 0"));
        }
        Ok(())
    }
}

impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// A [`KvStore`] over a managed Redis connection.
///
/// The connection manager transparently reconnects after failures; cloning
/// the store shares the underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    manager: redis::aio::ConnectionManager,
}

impl RedisStore {
    /// Validates the settings and connects to the server.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid settings or when the server cannot be
    /// reached.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, Error> {
        settings.validate()?;
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: redis::RedisConnectionInfo {
                db: settings.database.unwrap_or(0),
                password: settings.password.clone(),
                ..Default::default()
            },
        };
        let client = redis::Client::open(info).map_err(Error::from_message)?;
        let manager = client.get_connection_manager().await.map_err(Error::from_message)?;
        Ok(Self { manager })
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await.map_err(Error::from_message)?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), Error> {
        let mut conn = self.manager.clone();
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs()).await.map_err(Error::from_message)?;
            }
            None => {
                let _: () = conn.set(key, value).await.map_err(Error::from_message)?;
            }
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), Error> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();
        let _: () = conn.del(keys).await.map_err(Error::from_message)?;
        Ok(())
    }

    async fn flush_all(&self) -> Result<(), Error> {
        let mut conn = self.manager.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await.map_err(Error::from_message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_host() {
        let settings = RedisSettings::new("", 6379);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let settings = RedisSettings::new("cache.internal", 0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_accepts_reasonable_settings() {
        let settings = RedisSettings::new("cache.internal", 6379).with_password("secret").with_database(2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn debug_redacts_the_password() {
        let settings = RedisSettings::new("cache.internal", 6379).with_password("hunter2");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
