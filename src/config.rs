use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost,http://localhost:80,http://localhost:3000,http://localhost:8080,http://localhost:5173";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_retries: u32,
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            connect_retries: env_or("DB_CONNECT_RETRIES", 30),
            retry_delay_secs: env_or("DB_RETRY_DELAY_SECS", 10),
        };
        let jwt = JwtConfig {
            secret: require_secret(std::env::var("JWT_SECRET").ok())?,
        };
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
        );
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            db,
            jwt,
            cors_origins,
        })
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn require_secret(raw: Option<String>) -> anyhow::Result<String> {
    let secret = raw.context("JWT_SECRET is not set")?;
    anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");
    Ok(secret)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_skips_empty_entries() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn default_origins_cover_local_frontend() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 5);
        assert!(origins.contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn jwt_secret_must_be_present_and_non_blank() {
        assert!(require_secret(None).is_err());
        assert!(require_secret(Some(String::new())).is_err());
        assert!(require_secret(Some("   ".into())).is_err());
        assert_eq!(require_secret(Some("s3cret".into())).unwrap(), "s3cret");
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or::<u16>("GAMETRACKER_TEST_UNSET_PORT", 8080), 8080);
    }
}
