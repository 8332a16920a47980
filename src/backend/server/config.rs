/**
 * Server Configuration
 *
 * This module loads server settings from environment variables (a `.env`
 * file is read by `main` before this runs) and opens the optional
 * PostgreSQL connection.
 *
 * # Variables
 *
 * | Variable | Default |
 * |---|---|
 * | `PORT` | 5000 |
 * | `DATABASE_URL` | unset: in-memory store |
 * | `ACCESS_TOKEN_SECRET` / `REFRESH_TOKEN_SECRET` | development secrets |
 * | `ACCESS_TOKEN_EXPIRY_SECS` | 86400 |
 * | `REFRESH_TOKEN_EXPIRY_SECS` | 604800 |
 * | `CORS_ORIGIN` | `http://localhost:5173` |
 * | `COOKIE_SECURE` | false |
 * | `RATE_LIMIT_ENABLED` | false |
 * | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |
 */

use std::str::FromStr;

use sqlx::PgPool;

use crate::shared::ConfigError;

const DEV_ACCESS_SECRET: &str = "campusconnect-dev-access-secret";
const DEV_REFRESH_SECRET: &str = "campusconnect-dev-refresh-secret";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_expiry_secs: u64,
    pub refresh_token_expiry_secs: u64,
    pub cors_origin: String,
    /// Add the `Secure` attribute to session cookies
    pub cookie_secure: bool,
    /// Apply the login/register rate limits
    pub rate_limit_enabled: bool,
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: None,
            access_token_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_token_secret: DEV_REFRESH_SECRET.to_string(),
            access_token_expiry_secs: 24 * 60 * 60,
            refresh_token_expiry_secs: 7 * 24 * 60 * 60,
            cors_origin: "http://localhost:5173".to_string(),
            cookie_secure: false,
            rate_limit_enabled: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    env_string(name)
        .map(|value| {
            value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                name,
                value: value.clone(),
            })
        })
        .transpose()
}

impl ServerConfig {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let access_token_secret = env_string("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set. Using development secret.");
            defaults.access_token_secret.clone()
        });
        let refresh_token_secret = env_string("REFRESH_TOKEN_SECRET").unwrap_or_else(|| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set. Using development secret.");
            defaults.refresh_token_secret.clone()
        });

        Ok(Self {
            port: env_parse("PORT")?.unwrap_or(defaults.port),
            database_url: env_string("DATABASE_URL"),
            access_token_secret,
            refresh_token_secret,
            access_token_expiry_secs: env_parse("ACCESS_TOKEN_EXPIRY_SECS")?
                .unwrap_or(defaults.access_token_expiry_secs),
            refresh_token_expiry_secs: env_parse("REFRESH_TOKEN_EXPIRY_SECS")?
                .unwrap_or(defaults.refresh_token_expiry_secs),
            cors_origin: env_string("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            cookie_secure: env_parse("COOKIE_SECURE")?.unwrap_or(defaults.cookie_secure),
            rate_limit_enabled: env_parse("RATE_LIMIT_ENABLED")?
                .unwrap_or(defaults.rate_limit_enabled),
            bcrypt_cost: env_parse("BCRYPT_COST")?.unwrap_or(defaults.bcrypt_cost),
        })
    }

    pub fn with_rate_limit(mut self, enabled: bool) -> Self {
        self.rate_limit_enabled = enabled;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_access_token_expiry(mut self, secs: u64) -> Self {
        self.access_token_expiry_secs = secs;
        self
    }
}

/// Open the PostgreSQL pool and run migrations
///
/// Returns `None` when the connection cannot be established, so the caller
/// can fall back to the in-memory store.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
