use std::{env, path::PathBuf};

use crate::services::days::DEFAULT_DAYS_LIMIT;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root of the snapshot store, one directory per school.
    pub data_dir: PathBuf,
    /// Printed in export headers and footers.
    pub brand_name: String,
    pub days_with_activity_limit: usize,
    pub app_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            data_dir: required("DATA_DIR")?.into(),
            brand_name: env::var("BRAND_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Nursery Reports".into()),
            days_with_activity_limit: days_limit(env::var("DAYS_WITH_ACTIVITY_LIMIT").ok())?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
        })
    }

    /// Configuration for tests and tools that already know the data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: data_dir.into(),
            brand_name: "Nursery Reports".into(),
            days_with_activity_limit: DEFAULT_DAYS_LIMIT,
            app_base_url: "http://localhost".into(),
        }
    }
}

/// Unset, blank or zero falls back to the default.
fn days_limit(raw: Option<String>) -> anyhow::Result<usize> {
    let limit = match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => v.parse::<usize>()?,
        None => DEFAULT_DAYS_LIMIT,
    };
    Ok(if limit == 0 { DEFAULT_DAYS_LIMIT } else { limit })
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
