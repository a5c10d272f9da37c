//! Connection options.

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Deserializer};

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_POOL_SIZE: usize = 16;

/// Environment variable prefix read by [`ConnectOptions::from_env`].
pub const ENV_PREFIX: &str = "EASY_QUERY_";

/// Options used by [`crate::Connection::connect`].
///
/// Loaded from TOML:
///
/// ```
/// use easy_query::ConnectOptions;
///
/// let opts = ConnectOptions::from_toml_str(r#"
///     host = "127.0.0.1"
///     port = "5432"
///     user = "root"
///     database = "test"
///     password = "root"
///     debug = true
/// "#)?;
/// assert_eq!(opts.port, Some(5432));
/// assert!(opts.debug);
/// # Ok::<(), easy_query::DbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectOptions {
    pub host: String,
    #[serde(default, deserialize_with = "port_from_str_or_int")]
    pub port: Option<u16>,
    pub user: String,
    pub database: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Log every compiled statement.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
}

fn default_max_pool_size() -> usize {
    DEFAULT_MAX_POOL_SIZE
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Int(u16),
    Str(String),
}

fn port_from_str_or_int<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PortRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortRepr::Int(p)) => Ok(Some(p)),
        Some(PortRepr::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid port '{s}': {e}"))),
    }
}

impl ConnectOptions {
    /// Create options with the required fields.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            database: database.into(),
            password: None,
            debug: false,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(raw: &str) -> DbResult<Self> {
        let opts: Self = toml::from_str(raw)
            .map_err(|e| DbError::Config(format!("failed to parse options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read options from `EASY_QUERY_*` environment variables.
    ///
    /// `HOST`, `USER` and `DATABASE` are required; `PORT`, `PASSWORD`, `DEBUG` and
    /// `MAX_POOL_SIZE` are optional.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| DbError::Config(format!("{ENV_PREFIX}{key} is not set")))
        };

        let mut opts = Self::new(required("HOST")?, required("USER")?, required("DATABASE")?);

        if let Some(port) = lookup("PORT") {
            let port = port
                .trim()
                .parse()
                .map_err(|e| DbError::Config(format!("invalid {ENV_PREFIX}PORT '{port}': {e}")))?;
            opts.port = Some(port);
        }
        opts.password = lookup("PASSWORD");
        if let Some(debug) = lookup("DEBUG") {
            opts.debug = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(size) = lookup("MAX_POOL_SIZE") {
            opts.max_pool_size = size.trim().parse().map_err(|e| {
                DbError::Config(format!("invalid {ENV_PREFIX}MAX_POOL_SIZE '{size}': {e}"))
            })?;
        }

        opts.validate()?;
        Ok(opts)
    }

    /// Check required fields are non-empty.
    pub fn validate(&self) -> DbResult<()> {
        for (name, value) in [
            ("host", &self.host),
            ("user", &self.user),
            ("database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(DbError::Config(format!("{name} must not be empty")));
            }
        }
        if self.max_pool_size == 0 {
            return Err(DbError::Config("max_pool_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Driver configuration for these options.
    pub fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .user(&self.user)
            .dbname(&self.database);
        if let Some(port) = self.port {
            config.port(port);
        }
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn toml_defaults() {
        let opts = ConnectOptions::from_toml_str(
            r#"
            host = "localhost"
            user = "root"
            database = "test"
            "#,
        )
        .unwrap();
        assert_eq!(opts, ConnectOptions::new("localhost", "root", "test"));
        assert!(!opts.debug);
        assert_eq!(opts.max_pool_size, DEFAULT_MAX_POOL_SIZE);
    }

    #[test]
    fn toml_port_as_integer() {
        let opts = ConnectOptions::from_toml_str(
            r#"
            host = "localhost"
            port = 6543
            user = "root"
            database = "test"
            "#,
        )
        .unwrap();
        assert_eq!(opts.port, Some(6543));
    }

    #[test]
    fn toml_missing_database_is_config_error() {
        let err = ConnectOptions::from_toml_str(
            r#"
            host = "localhost"
            user = "root"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn toml_bad_port_is_config_error() {
        let err = ConnectOptions::from_toml_str(
            r#"
            host = "localhost"
            port = "abc"
            user = "root"
            database = "test"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn lookup_reads_all_keys() {
        let vars: HashMap<&str, &str> = [
            ("HOST", "db"),
            ("PORT", "5433"),
            ("USER", "app"),
            ("DATABASE", "shop"),
            ("PASSWORD", "secret"),
            ("DEBUG", "true"),
            ("MAX_POOL_SIZE", "4"),
        ]
        .into_iter()
        .collect();

        let opts = ConnectOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(
            opts,
            ConnectOptions::new("db", "app", "shop")
                .port(5433)
                .password("secret")
                .debug(true)
                .max_pool_size(4)
        );
    }

    #[test]
    fn lookup_missing_host() {
        let err = ConnectOptions::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("EASY_QUERY_HOST"));
    }

    #[test]
    fn empty_user_rejected() {
        let err = ConnectOptions::new("localhost", " ", "test").validate().unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn pg_config_carries_fields() {
        let config = ConnectOptions::new("localhost", "root", "test")
            .port(5433)
            .to_pg_config();
        assert_eq!(config.get_user(), Some("root"));
        assert_eq!(config.get_dbname(), Some("test"));
        assert_eq!(config.get_ports(), &[5433]);
    }
}
