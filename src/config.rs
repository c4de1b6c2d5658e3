use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::user::PasswordHasher;

/// Signing key used when `JWT_SECRET` is unset outside production.
/// Anyone who reads this source can forge tokens for such a deployment.
pub const DEV_JWT_SECRET: &str = "dev-only-insecure-jwt-secret";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: i64 = 24;
/// One year
pub const MAX_TOKEN_EXPIRATION_HOURS: i64 = 24 * 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set when APP_ENV=production")]
    MissingJwtSecret,

    #[error("DATABASE_URL must be set when APP_ENV=production")]
    MissingDatabaseUrl,

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup and injected into the app
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub jwt_secret: String,
    pub token_expiration_hours: i64,
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let env = match get("APP_ENV") {
            Some(value) => parse_var("APP_ENV", value)?,
            None => AppEnv::Development,
        };

        let jwt_secret = match (get("JWT_SECRET"), env) {
            (Some(secret), _) => secret,
            (None, AppEnv::Production) => return Err(ConfigError::MissingJwtSecret),
            (None, AppEnv::Development) => DEV_JWT_SECRET.to_string(),
        };

        let database_url = get("DATABASE_URL");
        if database_url.is_none() && env == AppEnv::Production {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let token_expiration_hours = match get("TOKEN_EXPIRATION_HOURS") {
            Some(value) => parse_var::<i64>("TOKEN_EXPIRATION_HOURS", value)
                .and_then(|hours| token_lifetime("TOKEN_EXPIRATION_HOURS", hours))?,
            None => DEFAULT_TOKEN_EXPIRATION_HOURS,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(value) => {
                let cost: u32 = parse_var("BCRYPT_COST", value.clone())?;
                if !(PasswordHasher::MIN_COST..=PasswordHasher::MAX_COST).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        name: "BCRYPT_COST",
                        value,
                    });
                }
                cost
            }
            None => PasswordHasher::DEFAULT_COST,
        };

        Ok(Self {
            env,
            jwt_secret,
            token_expiration_hours,
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            bcrypt_cost,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn token_lifetime(name: &'static str, hours: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_EXPIRATION_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: hours.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.env, AppEnv::Development);
        assert!(config.uses_dev_secret());
        assert_eq!(config.token_expiration_hours, 24);
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.bcrypt_cost, PasswordHasher::DEFAULT_COST);
    }

    #[test]
    fn test_production_requires_secret() {
        let result = config_from(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/playlists"),
        ]);
        assert_eq!(result.unwrap_err(), ConfigError::MissingJwtSecret);

        let blank = config_from(&[
            ("APP_ENV", "Production"),
            ("JWT_SECRET", "   "),
            ("DATABASE_URL", "postgres://localhost/playlists"),
        ]);
        assert_eq!(blank.unwrap_err(), ConfigError::MissingJwtSecret);
    }

    #[test]
    fn test_production_requires_database() {
        let result = config_from(&[("APP_ENV", "production"), ("JWT_SECRET", "s3cret")]);
        assert_eq!(result.unwrap_err(), ConfigError::MissingDatabaseUrl);
    }

    #[test]
    fn test_production_config() {
        let config = config_from(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/playlists"),
            ("TOKEN_EXPIRATION_HOURS", "12"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BCRYPT_COST", "12"),
        ])
        .unwrap();

        assert_eq!(config.env, AppEnv::Production);
        assert!(!config.uses_dev_secret());
        assert_eq!(config.token_expiration_hours, 12);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn test_token_lifetime_upper_bound() {
        let max = MAX_TOKEN_EXPIRATION_HOURS.to_string();
        let config = config_from(&[("TOKEN_EXPIRATION_HOURS", max.as_str())]).unwrap();
        assert_eq!(config.token_expiration_hours, MAX_TOKEN_EXPIRATION_HOURS);

        let over = (MAX_TOKEN_EXPIRATION_HOURS + 1).to_string();
        assert!(config_from(&[("TOKEN_EXPIRATION_HOURS", over.as_str())]).is_err());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("APP_ENV", "staging")]),
            Err(ConfigError::Invalid { name: "APP_ENV", .. })
        ));
        assert!(matches!(
            config_from(&[("TOKEN_EXPIRATION_HOURS", "0")]),
            Err(ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_HOURS",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("TOKEN_EXPIRATION_HOURS", "10000000000")]),
            Err(ConfigError::Invalid {
                name: "TOKEN_EXPIRATION_HOURS",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("BCRYPT_COST", "3")]),
            Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                ..
            })
        ));
    }
}
