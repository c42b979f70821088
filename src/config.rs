use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_FORECAST_APP_URL: &str = "https://hydronet-eta.vercel.app/";
const DEFAULT_FEEDBACK_FORM_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSdnRb0S8cP6aprOTOMtbpeSVSLHjf4tW-fNA4e4BVHBOwRHiw/viewform?usp=header";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub forecast_app_url: String,
    pub feedback_form_url: String,
    pub static_dir: String,
    pub slot_idle: Duration,
    pub store_max_slots: usize,
    pub secure_cookies: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            forecast_app_url: DEFAULT_FORECAST_APP_URL.to_string(),
            feedback_form_url: DEFAULT_FEEDBACK_FORM_URL.to_string(),
            static_dir: "static".to_string(),
            slot_idle: Duration::from_secs(12 * 3600),
            store_max_slots: 10_000,
            secure_cookies: false,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        let idle_hours: u64 = env_parsed("SLOT_IDLE_HOURS", 12)?;
        if idle_hours == 0 {
            anyhow::bail!("SLOT_IDLE_HOURS must be at least 1");
        }

        // Same markers the hosting platforms set
        let secure_cookies = std::env::var("RAILWAY_ENVIRONMENT").is_ok()
            || std::env::var("RENDER").is_ok()
            || std::env::var("FLY_APP_NAME").is_ok()
            || std::env::var("PRODUCTION").is_ok();

        Ok(Self {
            bind_addr,
            forecast_app_url: env_or("FORECAST_APP_URL", &defaults.forecast_app_url),
            feedback_form_url: env_or("FEEDBACK_FORM_URL", &defaults.feedback_form_url),
            static_dir: env_or("STATIC_DIR", &defaults.static_dir),
            slot_idle: Duration::from_secs(idle_hours * 3600),
            store_max_slots: env_parsed("STORE_MAX_SLOTS", defaults.store_max_slots)?,
            secure_cookies,
        })
    }
}
