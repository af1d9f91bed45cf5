use facility_core::import::resource::{ImportSettings, DEFAULT_COUNTRY_CODE, DEFAULT_MAX_ROWS};
use facility_core::rate_limit::{LoginThrottle, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MINS};

use crate::auth::jwt::JwtConfig;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// Upper bound of the connection pool (default: `10`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Row cap and phone defaults for import runs.
    pub import: ImportSettings,
    /// Failed-login threshold and window.
    pub login_throttle: LoginThrottle,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `DATABASE_URL`                | **required**            |
    /// | `DB_MAX_CONNECTIONS`          | `10`                    |
    /// | `IMPORT_MAX_ROWS`             | `5000`                  |
    /// | `IMPORT_DEFAULT_COUNTRY_CODE` | `+91`                   |
    /// | `RATE_LIMIT_MAX_ATTEMPTS`     | `5`                     |
    /// | `RATE_LIMIT_WINDOW_MINS`      | `15`                    |
    /// | `LOG_FORMAT`                  | `pretty` (or `json`)    |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is missing or a numeric variable does not parse.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let max_rows: usize = std::env::var("IMPORT_MAX_ROWS")
            .unwrap_or_else(|_| DEFAULT_MAX_ROWS.to_string())
            .parse()
            .expect("IMPORT_MAX_ROWS must be a valid usize");

        let default_country_code = std::env::var("IMPORT_DEFAULT_COUNTRY_CODE")
            .unwrap_or_else(|_| DEFAULT_COUNTRY_CODE.into());

        let max_attempts: i64 = std::env::var("RATE_LIMIT_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("RATE_LIMIT_MAX_ATTEMPTS must be a valid i64");

        let window_mins: i64 = std::env::var("RATE_LIMIT_WINDOW_MINS")
            .unwrap_or_else(|_| DEFAULT_WINDOW_MINS.to_string())
            .parse()
            .expect("RATE_LIMIT_WINDOW_MINS must be a valid i64");

        let log_format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            jwt,
            import: ImportSettings {
                max_rows,
                default_country_code,
            },
            login_throttle: LoginThrottle {
                max_attempts,
                window_mins,
            },
            log_format,
        }
    }
}
