use config::{Config, Environment, File};
use std::time::Duration;

use crate::error::ConfigError;

// bcrypt accepts work factors in this range
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Worker threads; actix defaults to one per physical core
    pub workers: Option<usize>,
    /// Allowed CORS origin; permissive when unset
    pub cors_origin: Option<String>,
    #[serde(default = "default_hash_cost")]
    pub password_hash_cost: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_hash_cost() -> u32 {
    10
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// JWT authentication settings
///
/// Access and refresh tokens are signed with different secrets so a leaked
/// refresh secret cannot mint access tokens and vice versa.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct JwtSettings {
    pub access_token_secret: String,
    pub access_token_expiry: i64,   // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_secret: String,
    pub refresh_token_expiry: i64,  // seconds (e.g., 604800 for 7 days)
    pub issuer: String,
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct CacheSettings {
    /// Entries never expire when unset
    pub ttl_seconds: Option<u64>,
    /// Also drop `<collection>-<id>` on update/delete, not only `all_<collection>`
    #[serde(default)]
    pub invalidate_detail_on_write: bool,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }
}

impl Settings {
    /// Reject combinations the token lifecycle cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let jwt = &self.jwt;
        if jwt.access_token_secret.is_empty() || jwt.refresh_token_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "jwt secrets must not be empty".to_string(),
            ));
        }
        if jwt.access_token_secret == jwt.refresh_token_secret {
            return Err(ConfigError::InvalidValue(
                "access and refresh token secrets must differ".to_string(),
            ));
        }
        if jwt.access_token_expiry <= 0 || jwt.refresh_token_expiry <= jwt.access_token_expiry {
            return Err(ConfigError::InvalidValue(
                "refresh_token_expiry must be greater than a positive access_token_expiry"
                    .to_string(),
            ));
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.application.password_hash_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "password_hash_cost must be between {} and {}",
                MIN_HASH_COST, MAX_HASH_COST
            )));
        }
        Ok(())
    }
}

/// Load settings from `configuration.yaml` (optional) and `APP__*` env vars
///
/// `APP__JWT__ACCESS_TOKEN_SECRET=...` overrides `jwt.access_token_secret`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
