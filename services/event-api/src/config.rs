use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;

use crate::auth::password::DEFAULT_ITERATIONS;
use crate::auth::tokens::DEFAULT_TOKEN_LIFETIME_HOURS;

pub const DEFAULT_JWT_SECRET: &str = "fallback_secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub jwt_secret: String,
    pub token_ttl: TimeDelta,
    pub password_iterations: u32,
    pub notify_webhook_url: Option<String>,
    pub notify_timeout: Duration,
    pub notify_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listen_addr = match lookup("EVENTLY_LISTEN_ADDR") {
            Some(addr) => addr.parse::<SocketAddr>().context("invalid EVENTLY_LISTEN_ADDR")?,
            None => {
                let port: u16 = lookup("PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .context("invalid PORT")?
                    .unwrap_or(3000);
                SocketAddr::from(([127, 0, 0, 1], port))
            }
        };

        let log_level = lookup("EVENTLY_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let token_ttl_hours = lookup("EVENTLY_TOKEN_TTL_HOURS")
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("invalid EVENTLY_TOKEN_TTL_HOURS")?
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_HOURS);
        if token_ttl_hours < 1 {
            bail!("EVENTLY_TOKEN_TTL_HOURS must be at least 1, got {token_ttl_hours}");
        }
        let token_ttl = TimeDelta::try_hours(token_ttl_hours)
            .context("EVENTLY_TOKEN_TTL_HOURS is out of range")?;

        let password_iterations = lookup("EVENTLY_PASSWORD_ITERATIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("invalid EVENTLY_PASSWORD_ITERATIONS")?
            .unwrap_or(DEFAULT_ITERATIONS);

        let notify_webhook_url = lookup("EVENTLY_NOTIFY_WEBHOOK_URL").filter(|s| !s.is_empty());

        let notify_timeout = lookup("EVENTLY_NOTIFY_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("invalid EVENTLY_NOTIFY_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let notify_from =
            lookup("EVENTLY_NOTIFY_FROM").unwrap_or_else(|| "no-reply@evently.local".to_string());

        Ok(Self {
            listen_addr,
            log_level,
            jwt_secret,
            token_ttl,
            password_iterations,
            notify_webhook_url,
            notify_timeout,
            notify_from,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
