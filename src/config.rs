use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

use crate::client::DEFAULT_BASE_URL;

/// Which remote access variant the client stores talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RemoteMode {
    Simulated,
    Http,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub project_name: String,

    // Rate limiting, 0 disables it
    pub rate_per_min: u32,

    pub log_dir: String,
    pub seed_demo_data: bool,

    // Client side
    pub remote: RemoteMode,
    pub api_url: String,
    pub simulated_latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            project_name: "HRMS Backend".to_string(),
            rate_per_min: 1000,
            log_dir: "logs".to_string(),
            seed_demo_data: true,
            remote: RemoteMode::Http,
            api_url: DEFAULT_BASE_URL.to_string(),
            simulated_latency_ms: 600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            project_name: env::var("PROJECT_NAME").unwrap_or(defaults.project_name),
            rate_per_min: parsed("RATE_PER_MIN", defaults.rate_per_min)?,
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            seed_demo_data: parsed("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            remote: parsed("HRMS_REMOTE", defaults.remote)?,
            api_url: env::var("HRMS_API_URL").unwrap_or(defaults.api_url),
            simulated_latency_ms: parsed("SIMULATED_LATENCY_MS", defaults.simulated_latency_ms)?,
        })
    }
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
