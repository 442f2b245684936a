//! Configuration module
//!
//! Env-driven configuration for the access-control service. Constructed once at
//! startup and passed explicitly into the components that need it; no global
//! state.

use std::env;

use crate::error::AppError;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const TOKEN_EXPIRY_DAYS: i64 = 90;
const TRUSTED_PROXY_COUNT: usize = 1;

/// Placeholder signing secret for local development. Exactly long enough to
/// satisfy the 32-byte minimum; refused outright in production.
pub const DEV_TOKEN_SECRET: &str = "ottowrite-dev-secret-0123456789abcdef";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// HMAC signing secret for access tokens. Must be at least 32 bytes.
    pub token_secret: String,
    /// Default lifetime of issued access tokens.
    pub token_expiry_days: i64,
    /// Number of trusted proxies in front of the service, for client IP
    /// extraction from X-Forwarded-For.
    pub trusted_proxy_count: usize,
    pub environment: String,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            token_secret: env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| DEV_TOKEN_SECRET.to_string()),
            token_expiry_days: env::var("TOKEN_EXPIRY_DAYS")
                .unwrap_or_else(|_| TOKEN_EXPIRY_DAYS.to_string())
                .parse()
                .unwrap_or(TOKEN_EXPIRY_DAYS),
            trusted_proxy_count: env::var("TRUSTED_PROXY_COUNT")
                .unwrap_or_else(|_| TRUSTED_PROXY_COUNT.to_string())
                .parse()
                .unwrap_or(TRUSTED_PROXY_COUNT),
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.token_secret.len() < 32 {
            return Err(AppError::Configuration(
                "TOKEN_SECRET must be at least 32 bytes long".to_string(),
            ));
        }

        if self.is_production() && self.token_secret == DEV_TOKEN_SECRET {
            return Err(AppError::Configuration(
                "TOKEN_SECRET must be set explicitly in production".to_string(),
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(AppError::Configuration(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
                    .to_string(),
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(AppError::Configuration(
                "DATABASE_URL must be a valid PostgreSQL connection string".to_string(),
            ));
        }

        if self.token_expiry_days <= 0 {
            return Err(AppError::Configuration(
                "TOKEN_EXPIRY_DAYS must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
