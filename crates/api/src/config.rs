use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::str::FromStr;

/// Errors raised while loading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Stage,
    Test,
}

impl AppEnv {
    /// Variable holding the database URL for this environment.
    pub fn database_url_var(self) -> &'static str {
        match self {
            AppEnv::Stage => "DATABASE_URL",
            AppEnv::Test => "TEST_DATABASE_URL",
        }
    }
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stage" => Ok(AppEnv::Stage),
            "test" => Ok(AppEnv::Test),
            other => Err(format!("expected 'stage' or 'test', got '{other}'")),
        }
    }
}

/// Levels accepted by `LOG_LEVEL`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period after the shutdown signal in seconds (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted total size of request headers (default: 1 MiB).
    pub max_header_bytes: usize,
    pub app_env: AppEnv,
    pub database_url: String,
    /// Connection pool size (default: `20`).
    pub db_max_connections: u32,
    /// Default tracing level when `RUST_LOG` is unset (default: `info`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `8080`                  |
    /// | `SERVER_ADDR`           | unset (`host:port`)     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `5`                     |
    /// | `MAX_HEADER_BYTES`      | `1048576`               |
    /// | `APP_ENV`               | `stage`                 |
    /// | `DATABASE_URL`          | required (`stage`)      |
    /// | `TEST_DATABASE_URL`     | required (`test`)       |
    /// | `DB_MAX_CONNECTIONS`    | `20`                    |
    /// | `LOG_LEVEL`             | `info`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let (host, port) = match get("SERVER_ADDR") {
            Some(addr) => split_server_addr(&addr)?,
            None => (
                get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
                parse_var("PORT", get("PORT"), 8080)?,
            ),
        };

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 30)?;
        let shutdown_timeout_secs =
            parse_var("SHUTDOWN_TIMEOUT_SECS", get("SHUTDOWN_TIMEOUT_SECS"), 5)?;
        let max_header_bytes = parse_var("MAX_HEADER_BYTES", get("MAX_HEADER_BYTES"), 1 << 20)?;
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 20)?;
        let app_env: AppEnv = parse_var("APP_ENV", get("APP_ENV"), AppEnv::Stage)?;

        let url_var = app_env.database_url_var();
        let database_url = get(url_var).ok_or(ConfigError::Missing { var: url_var })?;

        let log_level = get("LOG_LEVEL")
            .unwrap_or_else(|| "info".into())
            .trim()
            .to_ascii_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::Invalid {
                var: "LOG_LEVEL",
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
                value: log_level,
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_header_bytes,
            app_env,
            database_url,
            db_max_connections,
            log_level,
        })
    }

    /// Socket address to bind the listener to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e: AddrParseError| ConfigError::Invalid {
            var: "HOST",
            value: self.host.clone(),
            reason: e.to_string(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Default `EnvFilter` directives derived from `LOG_LEVEL`.
    pub fn log_filter(&self) -> String {
        let level = &self.log_level;
        format!("musiclib_api={level},musiclib_db={level},tower_http={level}")
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn split_server_addr(addr: &str) -> Result<(String, u16), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: "SERVER_ADDR",
        value: addr.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = addr
        .trim()
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;
    let port = port.parse().map_err(|_| invalid("port must be a valid u16"))?;
    let host = if host.is_empty() { "0.0.0.0" } else { host };

    Ok((host.to_string(), port))
}
