use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use client_core::{DEFAULT_RANDOM_COUNT, DEFAULT_SERVICE_URL};
use shared::domain::SortAlgorithm;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "sorter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub default_algorithm: SortAlgorithm,
    pub random_count: i64,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            default_algorithm: SortAlgorithm::default(),
            random_count: DEFAULT_RANDOM_COUNT,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Defaults, then the config file (if present), then environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if config_path.is_some() => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    let value_text = |key: &str| {
        file_cfg.get(key).map(|value| match value {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    };

    if let Some(v) = value_text("service_url") {
        settings.service_url = v;
    }
    if let Some(v) = value_text("algorithm") {
        settings.default_algorithm = v.parse()?;
    }
    if let Some(v) = value_text("random_count") {
        settings.random_count = v
            .parse()
            .map_err(|_| anyhow!("random_count must be an integer, got '{v}'"))?;
    }
    if let Some(v) = value_text("request_timeout_secs") {
        settings.request_timeout_secs = Some(
            v.parse()
                .map_err(|_| anyhow!("request_timeout_secs must be a whole number, got '{v}'"))?,
        );
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SORT_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = lookup("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = lookup("APP__ALGORITHM") {
        match v.parse() {
            Ok(algorithm) => settings.default_algorithm = algorithm,
            Err(err) => warn!("ignoring APP__ALGORITHM: {err}"),
        }
    }

    if let Some(v) = lookup("APP__RANDOM_COUNT") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.random_count = parsed;
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
}

/// Validates the service base URL and drops any trailing slash.
pub fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_SERVICE_URL.to_string());
    }

    let url = Url::parse(raw).with_context(|| format!("invalid service url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "service url '{raw}' must use http or https, got '{}'",
            url.scheme()
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
