//! Core data models for skycast
//!
//! This module contains the display-ready forecast records, the collection the
//! list view is bound to, and the client that fetches them from the weather API.

pub mod client;
pub mod forecast;

pub use client::{ForecastClient, ForecastError, DEFAULT_BASE_URL};
pub use forecast::{
    absolute_icon_url, format_humidity, format_temperature, format_weekday, parse_forecast,
};

/// One day's weather summary, already formatted for display
///
/// Built only from one element of the forecast JSON array and never mutated
/// afterwards; a new fetch replaces the whole set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDay {
    weekday: String,
    min_temp: String,
    max_temp: String,
    humidity: String,
    description: String,
    icon_url: String,
}

impl ForecastDay {
    /// Creates a record from raw API values
    ///
    /// # Arguments
    /// * `date` - ISO date (`YYYY-MM-DD`)
    /// * `min_temp` / `max_temp` - Temperatures in Fahrenheit
    /// * `humidity` - Average humidity, 0-100
    /// * `description` - Condition text
    /// * `icon_path` - Icon path as returned by the API (usually scheme-relative)
    ///
    /// # Returns
    /// * `Err(chrono::ParseError)` if `date` is not a valid ISO date
    pub fn from_raw(
        date: &str,
        min_temp: f64,
        max_temp: f64,
        humidity: f64,
        description: impl Into<String>,
        icon_path: &str,
    ) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            weekday: format_weekday(date)?,
            min_temp: format_temperature(min_temp),
            max_temp: format_temperature(max_temp),
            humidity: format_humidity(humidity),
            description: description.into(),
            icon_url: absolute_icon_url(icon_path),
        })
    }

    pub fn weekday(&self) -> &str {
        &self.weekday
    }

    pub fn min_temp(&self) -> &str {
        &self.min_temp
    }

    pub fn max_temp(&self) -> &str {
        &self.max_temp
    }

    pub fn humidity(&self) -> &str {
        &self.humidity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon_url(&self) -> &str {
        &self.icon_url
    }
}

/// Ordered forecast records currently bound to the list view
///
/// The only way to change the contents is [`ForecastCollection::replace`],
/// which swaps the whole sequence at once.
#[derive(Debug, Clone, Default)]
pub struct ForecastCollection {
    days: Vec<ForecastDay>,
    city: Option<String>,
}

impl ForecastCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the collection and repopulates it with `days` for `city`
    pub fn replace(&mut self, city: impl Into<String>, days: Vec<ForecastDay>) {
        self.days.clear();
        self.days.extend(days);
        self.city = Some(city.into());
    }

    /// City the current forecast belongs to, if any forecast was loaded
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    pub fn get(&self, index: usize) -> Option<&ForecastDay> {
        self.days.get(index)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
