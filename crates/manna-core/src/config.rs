//! ============================================================================
//! Kitchen Configuration
//! ============================================================================
//! Deployment settings read from the environment:
//! - MANNA_BACKEND_URL     base URL of the AI kitchen backend
//! - MANNA_EXTRA_HEADERS   `Name: value; Name: value` sent with every request
//! - MANNA_SCAN_DELAY_MS   analyzing time of the scan simulator
//! ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::KitchenError;

pub const DEFAULT_BACKEND_URL: &str = "https://manna-backend-1.onrender.com";

/// Tunnel in front of the backend refuses requests without it
pub const DEFAULT_EXTRA_HEADERS: &str = "Bypass-Tunnel-Reminder: true";

pub const DEFAULT_SCAN_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenConfig {
    pub backend_url: String,
    pub extra_headers: Vec<(String, String)>,
    pub scan_delay: Duration,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            extra_headers: vec![("Bypass-Tunnel-Reminder".to_string(), "true".to_string())],
            scan_delay: Duration::from_millis(DEFAULT_SCAN_DELAY_MS),
        }
    }
}

impl KitchenConfig {
    /// Build from process environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, KitchenError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, KitchenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("MANNA_BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let extra_headers = parse_headers(
            &lookup("MANNA_EXTRA_HEADERS").unwrap_or_else(|| DEFAULT_EXTRA_HEADERS.to_string()),
        )?;

        let scan_delay = match lookup("MANNA_SCAN_DELAY_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| {
                    KitchenError::Config(format!("MANNA_SCAN_DELAY_MS '{}': {}", raw, e))
                })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_SCAN_DELAY_MS),
        };

        Ok(Self {
            backend_url,
            extra_headers,
            scan_delay,
        })
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }
}

/// Parse `Name: value` pairs separated by `;`. Blank input means no headers.
pub fn parse_headers(raw: &str) -> Result<Vec<(String, String)>, KitchenError> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair
                .split_once(':')
                .ok_or_else(|| KitchenError::Config(format!("header '{}' is missing ':'", pair)))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(KitchenError::Config(format!("header '{}' has no name", pair)));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
