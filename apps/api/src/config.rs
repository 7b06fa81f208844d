use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Confidence at which the fallback chain stops early.
    pub accept_confidence: f64,
    /// Per-adapter time limit.
    pub adapter_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let accept_confidence = get("ACCEPT_CONFIDENCE")
            .unwrap_or_else(|| "0.70".to_string())
            .parse::<f64>()
            .context("ACCEPT_CONFIDENCE must be a number")?;
        if !(0.0..=1.0).contains(&accept_confidence) {
            bail!("ACCEPT_CONFIDENCE must be between 0 and 1, got {accept_confidence}");
        }

        let timeout_ms = get("ADAPTER_TIMEOUT_MS")
            .unwrap_or_else(|| "10000".to_string())
            .parse::<u64>()
            .context("ADAPTER_TIMEOUT_MS must be a whole number of milliseconds")?;
        if timeout_ms == 0 {
            bail!("ADAPTER_TIMEOUT_MS must be greater than zero");
        }

        let max_upload_bytes = get("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|| (10 * 1024 * 1024).to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_BYTES must be a whole number of bytes")?;

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            accept_confidence,
            adapter_timeout: Duration::from_millis(timeout_ms),
            max_upload_bytes,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            accept_confidence: 0.70,
            adapter_timeout: Duration::from_millis(10_000),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
