//! Command-line interface parsing for skycast
//!
//! This module handles parsing of CLI arguments using clap. The API key and
//! request template can also come from the environment, so a key never has
//! to appear in shell history.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::client::{template_is_valid, DEFAULT_DAYS};
use crate::data::{ForecastClient, DEFAULT_BASE_URL};

/// Largest number of forecast days the API serves
pub const MAX_DAYS: u8 = 14;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// No API key on the command line or in the environment
    #[error("Missing API key: pass --api-key or set SKYCAST_API_KEY")]
    MissingApiKey,

    /// Day count outside 1..=14
    #[error("Invalid day count: {0}. Expected a value between 1 and 14")]
    InvalidDays(u8),

    /// Request template without exactly one {key} and one {city}
    #[error("Invalid base URL template: '{0}'. It must contain {{key}} and {{city}} exactly once")]
    InvalidTemplate(String),
}

/// skycast - multi-day weather forecast for any city, in your terminal
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Multi-day weather forecast for any city, in your terminal")]
#[command(version)]
pub struct Cli {
    /// City to fetch as soon as the app starts
    ///
    /// Examples:
    ///   skycast Boston
    ///   skycast "St. John's"
    #[arg(value_name = "CITY")]
    pub city: Option<String>,

    /// API key for the weather service
    #[arg(long, env = "SKYCAST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request template; {key}, {city} and optionally {days} are substituted
    #[arg(long, env = "SKYCAST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of forecast days to request (1-14)
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    pub days: u8,

    /// Write logs to this file instead of the cache directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Validated configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_key: String,
    pub base_url: String,
    pub days: u8,
    /// City to fetch immediately, if one was given
    pub initial_city: Option<String>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the key is missing, the day count is out of
    ///   range, or the template lacks a placeholder
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        if cli.days == 0 || cli.days > MAX_DAYS {
            return Err(CliError::InvalidDays(cli.days));
        }

        if !template_is_valid(&cli.base_url) {
            return Err(CliError::InvalidTemplate(cli.base_url.clone()));
        }

        let initial_city = cli
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            api_key,
            base_url: cli.base_url.clone(),
            days: cli.days,
            initial_city,
            log_file: cli.log_file.clone(),
        })
    }

    /// Builds the forecast client described by this configuration
    pub fn forecast_client(&self) -> ForecastClient {
        ForecastClient::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_days(self.days)
    }
}
