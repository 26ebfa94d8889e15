use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use log::info;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PIXEL_PATH: &str = "assets/pixel.gif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

/// Response of an update that matched no contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingContactPolicy {
    /// Report success anyway.
    #[default]
    Created,
    NotFound,
}

/// Which contacts the dashboard counts as "sent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentCriterion {
    /// `mailingStage == 1`
    #[default]
    MailingStage,
    /// `email_sent == true`
    EmailSent,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mongodb" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend `{}`", other),
        }
    }
}

impl FromStr for MissingContactPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created" => Ok(MissingContactPolicy::Created),
            "not_found" => Ok(MissingContactPolicy::NotFound),
            other => bail!("expected `created` or `not_found`, got `{}`", other),
        }
    }
}

impl FromStr for SentCriterion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mailing_stage" => Ok(SentCriterion::MailingStage),
            "email_sent" => Ok(SentCriterion::EmailSent),
            other => bail!("expected `mailing_stage` or `email_sent`, got `{}`", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: Option<String>,
    pub pixel_path: String,
    pub missing_contact: MissingContactPolicy,
    pub sent_criterion: SentCriterion,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Reads the process environment. Call after `dotenv()`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = parse_or(&var, "STORE_BACKEND", StoreBackend::MongoDb)?;
        let mongodb_uri = var("MONGODB_URI");
        if backend == StoreBackend::MongoDb && mongodb_uri.is_none() {
            bail!("MONGODB_URI not set");
        }

        let config = Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            backend,
            mongodb_uri,
            mongodb_database: var("MONGODB_DATABASE"),
            pixel_path: var("PIXEL_PATH").unwrap_or_else(|| DEFAULT_PIXEL_PATH.to_string()),
            missing_contact: parse_or(&var, "UPDATE_MISSING_CONTACT", Default::default())?,
            sent_criterion: parse_or(&var, "DASHBOARD_SENT_FIELD", Default::default())?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        info!(
            "Configuration loaded: {}:{} backend={:?}",
            config.host, config.port, config.backend
        );
        Ok(config)
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid {} value `{}`", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("MONGODB_URI", "mongodb://localhost:27017/mail")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.backend, StoreBackend::MongoDb);
        assert_eq!(config.pixel_path, DEFAULT_PIXEL_PATH);
        assert_eq!(config.missing_contact, MissingContactPolicy::Created);
        assert_eq!(config.sent_criterion, SentCriterion::MailingStage);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn mongodb_requires_uri() {
        assert!(load(&[]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory")]).is_ok());
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "8081"),
            ("UPDATE_MISSING_CONTACT", "not_found"),
            ("DASHBOARD_SENT_FIELD", "email_sent"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.missing_contact, MissingContactPolicy::NotFound);
        assert_eq!(config.sent_criterion, SentCriterion::EmailSent);
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load(&[("STORE_BACKEND", "memory"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("DASHBOARD_SENT_FIELD", "opened")]).is_err());
        assert!(load(&[("STORE_BACKEND", "sled")]).is_err());
    }
}
