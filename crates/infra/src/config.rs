//! Configuration loading and representation.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `DATABASE_URL` | unset | Postgres connection string; unset selects the in-memory store |
//! | `PORT` | `5000` | listening port |
//! | `APP_ENV` | `development` | `development`, `test` or `production` |

use core::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: expected an integer in 1..=65535")]
    InvalidPort(String),

    #[error("invalid APP_ENV {0:?}: expected development, test or production")]
    InvalidEnvironment(String),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Test => "test",
            AppEnvironment::Production => "production",
        }
    }

    /// Under `test` the binary neither connects nor listens; test harnesses
    /// build the router themselves.
    pub fn auto_start(&self) -> bool {
        !matches!(self, AppEnvironment::Test)
    }
}

impl core::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnvironment::Development),
            "test" => Ok(AppEnvironment::Test),
            "production" | "prod" => Ok(AppEnvironment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub port: u16,
    pub environment: AppEnvironment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            port: DEFAULT_PORT,
            environment: AppEnvironment::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
        };

        let environment = match lookup("APP_ENV") {
            None => AppEnvironment::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(Self {
            database_url,
            port,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.environment.auto_start());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/inventory"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/inventory"));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.environment, AppEnvironment::Production);
    }

    #[test]
    fn test_environment_suppresses_auto_start() {
        let cfg = AppConfig::from_lookup(lookup(&[("APP_ENV", "test")])).unwrap();
        assert!(!cfg.environment.auto_start());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("PORT", "abc")])),
            Err(ConfigError::InvalidPort("abc".to_string()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("PORT", "0")])),
            Err(ConfigError::InvalidPort("0".to_string()))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("APP_ENV", "staging")])),
            Err(ConfigError::InvalidEnvironment(_))
        ));
    }

    #[test]
    fn blank_database_url_is_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(cfg.database_url, None);
    }
}
