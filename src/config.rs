// Runtime configuration, read once from the environment (after dotenv).

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-insecure-secret-change-this";

pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 260_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Base URL of the web front-end, used for redirects and emailed links.
    pub app_url: String,
    pub cookie_secure: bool,
    pub password_iterations: u32,
    pub auto_migrate: bool,
    pub demo_seed: bool,
    pub admin: Option<AdminBootstrap>,
    pub cities_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any key lookup, so tests don't touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set, using insecure development secret");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            _ => None,
        };

        let password_iterations = parse_or(
            "PASSWORD_ITERATIONS",
            get("PASSWORD_ITERATIONS"),
            DEFAULT_PASSWORD_ITERATIONS,
        )?;
        if password_iterations == 0 {
            return Err(ConfigError::Invalid { name: "PASSWORD_ITERATIONS", value: "0".to_string() });
        }

        Ok(Self {
            database_url,
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), SocketAddr::from(([127, 0, 0, 1], 8080)))?,
            jwt_secret,
            app_url: get("APP_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            cookie_secure: parse_bool("COOKIE_SECURE", get("COOKIE_SECURE"), false)?,
            password_iterations,
            auto_migrate: parse_bool("AUTO_MIGRATE", get("AUTO_MIGRATE"), true)?,
            demo_seed: parse_bool("DEMO_SEED", get("DEMO_SEED"), false)?,
            admin,
            cities_file: get("CITIES_FILE").map(PathBuf::from),
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let normalized = raw.as_deref().map(|v| v.trim().to_ascii_lowercase());
    match normalized {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            name,
            value: raw.unwrap_or_default(),
        }),
    }
}
