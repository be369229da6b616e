//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `DRCTL_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `DRCTL_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides the database section if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `DRCTL_DATABASE__TYPE=memory` sets the `database.type` field.
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! DRCTL_PORT=8080
//!
//! # Point at a database file (preferred method)
//! DATABASE_URL="sqlite://doctors.db?mode=rwc"
//!
//! # Or use the nested form
//! DRCTL_DATABASE__TYPE=file
//! DRCTL_DATABASE__PATH=doctors.db
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DRCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// Loaded from YAML and environment variables; every field has a default so
/// the service starts with no config file at all.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Raw DATABASE_URL override, folded into `database` during load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Database configuration - in-memory, file-backed, or an explicit URL
    pub database: DatabaseConfig,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database: DatabaseConfig::default(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Connection pool settings passed through to SQLx.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

/// Where doctor records live.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum DatabaseConfig {
    /// In-memory SQLite database; data is lost on shutdown
    Memory,
    /// File-backed SQLite database, created on first start
    File {
        /// Path to the database file
        path: PathBuf,
        #[serde(default)]
        pool: PoolSettings,
    },
    /// Explicit SQLite connection URL
    Url {
        url: String,
        #[serde(default)]
        pool: PoolSettings,
    },
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::File {
            path: PathBuf::from("doctors.db"),
            pool: PoolSettings::default(),
        }
    }
}

impl DatabaseConfig {
    /// SQLx connection string for this configuration
    pub fn connection_string(&self) -> String {
        match self {
            DatabaseConfig::Memory => "sqlite::memory:".to_string(),
            DatabaseConfig::File { path, .. } => {
                format!("sqlite://{}?mode=rwc", path.display())
            }
            DatabaseConfig::Url { url, .. } => url.clone(),
        }
    }

    /// Pool settings for this configuration.
    ///
    /// An in-memory SQLite database exists per-connection, so the pool is
    /// pinned to a single connection - more would each see an empty schema.
    pub fn pool_settings(&self) -> PoolSettings {
        match self {
            DatabaseConfig::Memory => PoolSettings {
                max_connections: 1,
                ..PoolSettings::default()
            },
            DatabaseConfig::File { pool, .. } | DatabaseConfig::Url { pool, .. } => pool.clone(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL wins over the structured database section
        if let Some(url) = config.database_url.take() {
            let pool = config.database.pool_settings();
            config.database = DatabaseConfig::Url { url, pool };
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("DRCTL_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: host must not be empty".to_string(),
            });
        }

        if let DatabaseConfig::Url { url, .. } = &self.database
            && !url.starts_with("sqlite:")
        {
            return Err(Error::Internal {
                operation: format!("Config validation: database.url must be a sqlite: URL, got '{url}'"),
            });
        }

        for origin in &self.cors_allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(Error::Internal {
                    operation: format!("Config validation: invalid CORS origin '{origin}'"),
                });
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn memory_database_pins_pool_to_one_connection() {
        assert_eq!(DatabaseConfig::Memory.pool_settings().max_connections, 1);
    }

    #[test]
    fn database_url_env_overrides_config_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 4000
                database:
                  type: file
                  path: from-yaml.db
                "#,
            )?;
            jail.set_env("DATABASE_URL", "sqlite://from-env.db?mode=rwc");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");

            assert_eq!(config.port, 4000);
            assert_eq!(config.database.connection_string(), "sqlite://from-env.db?mode=rwc");
            Ok(())
        });
    }

    #[test]
    fn env_prefix_overrides_nested_fields() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 4000")?;
            jail.set_env("DRCTL_DATABASE__TYPE", "memory");
            jail.set_env("DRCTL_PORT", "5000");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");

            assert_eq!(config.port, 5000);
            assert!(matches!(config.database, DatabaseConfig::Memory));
            Ok(())
        });
    }

    #[test]
    fn non_sqlite_url_is_rejected() {
        let config = Config {
            database: DatabaseConfig::Url {
                url: "postgresql://localhost/doctors".to_string(),
                pool: PoolSettings::default(),
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
