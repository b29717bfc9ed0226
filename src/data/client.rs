//! Forecast API client
//!
//! Builds request URLs from a base template and fetches the multi-day forecast
//! for a free-text city name.

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::forecast::parse_forecast;
use super::ForecastDay;

/// Default request template for the WeatherAPI.com forecast endpoint
pub const DEFAULT_BASE_URL: &str =
    "https://api.weatherapi.com/v1/forecast.json?key={key}&q={city}&days={days}";

/// Placeholder for the API key in the base template
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Placeholder for the encoded city name in the base template
pub const CITY_PLACEHOLDER: &str = "{city}";

/// Placeholder for the number of forecast days (optional in the template)
pub const DAYS_PLACEHOLDER: &str = "{days}";

/// Default number of forecast days requested
pub const DEFAULT_DAYS: u8 = 7;

/// Errors that can occur while requesting a forecast
///
/// Each variant maps to one fixed message for the user; the payload carries
/// the detail that goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// The city name or template could not be turned into a request URL
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport failure or a non-200 response
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Read(String),

    /// The response body is not a well-formed forecast
    #[error("Failed to parse forecast: {0}")]
    Parse(String),
}

impl ForecastError {
    /// Fixed message shown to the user for this kind of failure
    pub fn user_message(&self) -> &'static str {
        match self {
            ForecastError::InvalidInput(_) => "Invalid city name",
            ForecastError::Connect(_) => "Unable to connect to weather service",
            ForecastError::Read(_) => "Unable to read weather data",
            ForecastError::Parse(_) => "No forecast data available",
        }
    }
}

/// Returns true if `template` has exactly one key and one city placeholder
/// and at most one days placeholder
pub fn template_is_valid(template: &str) -> bool {
    template.matches(KEY_PLACEHOLDER).count() == 1
        && template.matches(CITY_PLACEHOLDER).count() == 1
        && template.matches(DAYS_PLACEHOLDER).count() <= 1
}

/// Client for fetching forecasts from the weather API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    api_key: String,
    base_url: String,
    days: u8,
}

impl ForecastClient {
    /// Create a new ForecastClient against the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new ForecastClient with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            days: DEFAULT_DAYS,
        }
    }

    /// Use a custom request template (see [`DEFAULT_BASE_URL`] for the placeholders)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the number of forecast days requested
    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    /// The underlying HTTP client, shared with icon downloads
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Builds the request URL for a free-text city name
    ///
    /// # Arguments
    /// * `city` - City as typed by the user; surrounding whitespace is ignored
    ///
    /// # Returns
    /// * `Ok(Url)` - Absolute http(s) URL with the key and encoded city embedded
    /// * `Err(ForecastError::InvalidInput)` - Empty city, bad template, or an
    ///   unparseable result
    pub fn build_url(&self, city: &str) -> Result<Url, ForecastError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ForecastError::InvalidInput("city name is empty".to_string()));
        }
        if !template_is_valid(&self.base_url) {
            return Err(ForecastError::InvalidInput(format!(
                "base URL template must contain {} and {} exactly once",
                KEY_PLACEHOLDER, CITY_PLACEHOLDER
            )));
        }

        let raw = self
            .base_url
            .replacen(KEY_PLACEHOLDER, &urlencoding::encode(&self.api_key), 1)
            .replacen(CITY_PLACEHOLDER, &urlencoding::encode(city), 1)
            .replacen(DAYS_PLACEHOLDER, &self.days.to_string(), 1);

        let url = Url::parse(&raw).map_err(|e| ForecastError::InvalidInput(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ForecastError::InvalidInput(format!(
                    "unsupported URL scheme '{}'",
                    other
                )))
            }
        }

        debug!(
            host = url.host_str().unwrap_or(""),
            path = url.path(),
            city,
            "built forecast URL"
        );
        Ok(url)
    }

    /// Fetches and parses the forecast at `url`
    ///
    /// # Returns
    /// * `Ok(Vec<ForecastDay>)` - Parsed days in source order
    /// * `Err(ForecastError::Connect)` - Transport error or status other than 200
    /// * `Err(ForecastError::Read)` - Body could not be read
    /// * `Err(ForecastError::Parse)` - Body is not a well-formed forecast
    pub async fn fetch(&self, url: Url) -> Result<Vec<ForecastDay>, ForecastError> {
        let path = url.path().to_string();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, path = %path, "forecast request failed");
            ForecastError::Connect(e.to_string())
        })?;

        let status = response.status();
        debug!(%status, path = %path, "forecast response");
        if status != StatusCode::OK {
            warn!(%status, path = %path, "forecast request returned non-200 status");
            return Err(ForecastError::Connect(format!("HTTP status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::Read(e.to_string()))?;

        let days = parse_forecast(&body).map_err(|e| {
            warn!(error = %e, "forecast parse failed");
            e
        })?;
        info!(days = days.len(), "forecast loaded");
        Ok(days)
    }

    /// Builds the URL for `city` and fetches its forecast
    pub async fn fetch_city(&self, city: &str) -> Result<Vec<ForecastDay>, ForecastError> {
        let url = self.build_url(city)?;
        self.fetch(url).await
    }
}
