use std::{net::SocketAddr, str::FromStr, time::Duration};

const DEFAULT_DB_PATH: &str = "./db/app.db";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8086))
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads the `F2086_*` environment variables. Unparseable values fall back
    /// to their defaults.
    pub fn from_env() -> Self {
        let listen_addr = parse_or_default(
            "F2086_LISTEN_ADDR",
            std::env::var("F2086_LISTEN_ADDR").ok(),
            default_listen_addr(),
        );
        let db_path = std::env::var("F2086_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.into());
        let cors_allow = parse_origins(
            &std::env::var("F2086_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let timeout_ms = parse_or_default(
            "F2086_REQUEST_TIMEOUT_MS",
            std::env::var("F2086_REQUEST_TIMEOUT_MS").ok(),
            DEFAULT_REQUEST_TIMEOUT_MS,
        );
        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Defaults with the database at `db_path`.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {} '{}', using {}", name, raw, default);
                default
            }
        },
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
