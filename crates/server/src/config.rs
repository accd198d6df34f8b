//! Startup configuration read from the environment

use log::debug;
use payments::{PaymentConfig, PaypalConfig, StripeConfig};
use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_SITE_URL: &str = "http://localhost:5173";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_PAYPAL_API_BASE: &str = "https://api-m.sandbox.paypal.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Run pending migrations before serving
    pub auto_migrate: bool,
    pub payments: PaymentConfig,
}

impl Config {
    /// Read the process environment; `main` loads `.env` beforehand
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| {
                    debug!("{name} is not set, using {default:?}");
                    default.to_string()
                })
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let auto_migrate = match var("AUTO_MIGRATE", "false").to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(ConfigError::Invalid {
                    name: "AUTO_MIGRATE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url,
            bind_address: var("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            auto_migrate,
            payments: PaymentConfig {
                site_url: var("SITE_URL", DEFAULT_SITE_URL),
                currency: var("CURRENCY", "usd").to_lowercase(),
                stripe: StripeConfig {
                    secret_key: var("STRIPE_SECRET_KEY", ""),
                    api_base: var("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
                },
                paypal: PaypalConfig {
                    client_id: var("PAYPAL_CLIENT_ID", ""),
                    secret_id: var("PAYPAL_SECRET_ID", ""),
                    api_base: var("PAYPAL_API_BASE", DEFAULT_PAYPAL_API_BASE),
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(!config.auto_migrate);
        assert_eq!(config.payments.currency, "usd");
        assert_eq!(config.payments.stripe.api_base, "https://api.stripe.com");
        assert_eq!(
            config.payments.paypal.api_base,
            "https://api-m.sandbox.paypal.com"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("AUTO_MIGRATE", "TRUE"),
            ("CURRENCY", "EUR"),
            ("SITE_URL", "https://learn.example.com"),
            ("STRIPE_SECRET_KEY", "sk_live"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert!(config.auto_migrate);
        assert_eq!(config.payments.currency, "eur");
        assert_eq!(config.payments.site_url, "https://learn.example.com");
        assert_eq!(config.payments.stripe.secret_key, "sk_live");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDRESS", "   "),
            ("CURRENCY", ""),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.payments.currency, "usd");
        assert_eq!(config.payments.site_url, "http://localhost:5173");
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(
            load(&[("DATABASE_URL", "  ")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn test_invalid_flag() {
        assert_eq!(
            load(&[("DATABASE_URL", "sqlite::memory:"), ("AUTO_MIGRATE", "maybe")]).unwrap_err(),
            ConfigError::Invalid {
                name: "AUTO_MIGRATE",
                value: "maybe".to_string()
            }
        );
    }
}
