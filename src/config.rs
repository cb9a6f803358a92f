//! Configuration loading from TOML with environment variable overrides.
//!
//! Reads an optional `config.toml` for server and model settings, then
//! applies the process environment on top (`API_KEYS`, `CORS_ALLOW_ORIGINS`,
//! `MU_DEFAULT`, `HOME_ADV`, `HOST`, `PORT`). API keys only ever come from
//! the environment and are held as secrets.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::engine::poisson::validate_rates;
use crate::types::MatchRates;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            cors_allow_origins: vec!["*".into()],
        }
    }
}

/// Inputs to the default goal-rate policy.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// Base expected goals per side.
    pub mu_default: f64,
    /// Multiplier applied to the home side's base rate.
    pub home_adv: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mu_default: 1.35,
            home_adv: 1.10,
        }
    }
}

impl ModelConfig {
    pub fn default_rates(&self) -> MatchRates {
        MatchRates::from_defaults(self.mu_default, self.home_adv)
    }
}

/// Allow-list of API keys accepted on authenticated routes.
#[derive(Debug, Default)]
pub struct ApiKeys(Vec<SecretString>);

impl ApiKeys {
    /// Parse a comma-separated list, dropping blank entries.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| SecretString::new(k.to_string()))
                .collect(),
        )
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k.expose_secret() == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {name}: {raw:?}"))
}

impl AppConfig {
    /// Load configuration from a TOML file (if present) and the process
    /// environment.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            toml::from_str::<AppConfig>(&contents)
                .with_context(|| format!("Failed to parse config file: {path}"))?
        } else {
            AppConfig::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every defaulted request fail.
    pub fn validate(&self) -> Result<()> {
        validate_rates(&self.model.default_rates()).with_context(|| {
            format!(
                "Invalid model configuration: mu_default={}, home_adv={}",
                self.model.mu_default, self.model.home_adv
            )
        })
    }

    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("API_KEYS") {
            self.api_keys = ApiKeys::parse(&raw);
        }
        if let Some(raw) = lookup("CORS_ALLOW_ORIGINS") {
            let origins = split_list(&raw);
            if !origins.is_empty() {
                self.server.cors_allow_origins = origins;
            }
        }
        if let Some(raw) = lookup("MU_DEFAULT") {
            self.model.mu_default = parse_var("MU_DEFAULT", &raw)?;
        }
        if let Some(raw) = lookup("HOME_ADV") {
            self.model.home_adv = parse_var("HOME_ADV", &raw)?;
        }
        if let Some(raw) = lookup("HOST") {
            self.server.host = raw.trim().to_string();
        }
        if let Some(raw) = lookup("PORT") {
            self.server.port = parse_var("PORT", &raw)?;
        }
        Ok(())
    }
}
