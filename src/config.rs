use dotenv::dotenv;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Process configuration. Built once by the entry point and handed to
/// whatever needs it.
#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub seed_demo_users: bool,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("seed_demo_users", &self.seed_demo_users)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_level", &self.log_level)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, default: bool| lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(default);

        Self {
            host: parsed(&lookup, "HOST").unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: parsed(&lookup, "PORT").unwrap_or(5000),
            environment: lookup("NODE_ENV")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(5),
            run_migrations: flag("RUN_MIGRATIONS", true),
            seed_demo_users: flag("SEED_DEMO_USERS", false),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            request_timeout: Duration::from_secs(parsed(&lookup, "REQUEST_TIMEOUT_SECS").unwrap_or(30)),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
