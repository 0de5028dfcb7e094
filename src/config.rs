use std::collections::HashMap;
use std::env;

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Settings the request handlers need at runtime.
#[derive(Debug, Clone)]
pub struct ShopSettings {
    admin_emails: Vec<String>,
    pub notice_duration: Duration,
    pub currency_symbol: String,
}

impl ShopSettings {
    pub fn new(admin_emails: Vec<String>, notice_duration: Duration, currency_symbol: &str) -> Self {
        Self {
            admin_emails: admin_emails
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            notice_duration,
            currency_symbol: currency_symbol.to_string(),
        }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self::new(Vec::new(), Duration::seconds(3), "₹")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub shop: ShopSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL")
            .ok_or(ConfigError::Missing("DATABASE_URL"))?
            .to_string();
        let host = get("HOST").unwrap_or("0.0.0.0").to_string();
        let port = match get("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v.to_string(),
            })?,
            None => 8080,
        };
        let notice_secs: i64 = match get("CHECKOUT_NOTICE_SECS") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|s| (0..=86_400).contains(s))
                .ok_or_else(|| ConfigError::Invalid {
                    name: "CHECKOUT_NOTICE_SECS",
                    value: v.to_string(),
                })?,
            None => 3,
        };
        let admin_emails = get("ADMIN_EMAILS")
            .map(|v| v.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let currency_symbol = get("CURRENCY_SYMBOL").unwrap_or("₹");

        Ok(Self {
            database_url,
            host,
            port,
            shop: ShopSettings::new(
                admin_emails,
                Duration::seconds(notice_secs),
                currency_symbol,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = AppConfig::from_vars(vars(&[("DATABASE_URL", "postgres://db")]))
            .expect("valid config");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.shop.notice_duration, Duration::seconds(3));
        assert_eq!(config.shop.currency_symbol, "₹");
        assert!(!config.shop.is_admin("anyone@canteen.local"));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_vars(vars(&[("PORT", "80")])).expect_err("should fail");
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = AppConfig::from_vars(vars(&[("DATABASE_URL", "x"), ("PORT", "eighty")]))
            .expect_err("should fail");
        assert_eq!(err.to_string(), "PORT has an invalid value 'eighty'");
    }

    #[test]
    fn negative_notice_duration_is_rejected() {
        let err = AppConfig::from_vars(vars(&[
            ("DATABASE_URL", "x"),
            ("CHECKOUT_NOTICE_SECS", "-1"),
        ]))
        .expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { name: "CHECKOUT_NOTICE_SECS", .. }));
    }

    #[test]
    fn admin_emails_are_case_insensitive() {
        let config = AppConfig::from_vars(vars(&[
            ("DATABASE_URL", "x"),
            ("ADMIN_EMAILS", " Boss@Canteen.local , ,chef@canteen.local"),
        ]))
        .expect("valid config");

        assert!(config.shop.is_admin("boss@canteen.local"));
        assert!(config.shop.is_admin("CHEF@canteen.local"));
        assert!(!config.shop.is_admin("guest@canteen.local"));
    }
}
