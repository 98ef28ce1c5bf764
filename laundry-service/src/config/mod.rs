use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;
use std::env;

pub const DEFAULT_JWT_SECRET: &str = "default_secret";
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://127.0.0.1:5500,http://127.0.0.1:5502,https://apkclaundry.github.io";

#[derive(Debug, Clone)]
pub struct LaundryConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl LaundryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;

        let secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if is_prod => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET is required in production but not set"
                )))
            }
            // Warned about in main once tracing is up.
            _ => DEFAULT_JWT_SECRET.to_string(),
        };

        let expiry_hours = get_env("JWT_EXPIRY_HOURS", Some("24"), false)?
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                AppError::ConfigError(anyhow::anyhow!("Invalid JWT_EXPIRY_HOURS: {}", e))
            })?;

        Ok(LaundryConfig {
            common,
            environment,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("apkclaundry"), false)?,
            },
            jwt: JwtConfig {
                secret,
                expiry_hours,
            },
            security: SecurityConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    false,
                )?),
            },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
