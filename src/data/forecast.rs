//! Forecast response parsing and display formatting
//!
//! Turns the weather API's forecast JSON into [`ForecastDay`] records. Parsing
//! is all-or-nothing: one malformed day discards the whole batch.

use chrono::NaiveDate;
use serde::Deserialize;

use super::client::ForecastError;
use super::ForecastDay;

/// Display pattern for forecast dates, e.g. "Thursday, July 04 2024"
const WEEKDAY_FORMAT: &str = "%A, %B %d %Y";

/// Scheme prepended to the API's scheme-relative icon paths
const ICON_SCHEME: &str = "https:";

/// Parses a forecast response body into display records, in source order
///
/// # Arguments
/// * `body` - Full response body of a forecast request
///
/// # Returns
/// * `Ok(Vec<ForecastDay>)` - One record per element of `forecast.forecastday`
/// * `Err(ForecastError::Parse)` - If the JSON is malformed, a field is missing,
///   or a date is not a valid ISO date
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastDay>, ForecastError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| ForecastError::Parse(e.to_string()))?;

    response
        .forecast
        .forecastday
        .into_iter()
        .map(|entry| {
            let day = entry.day;
            ForecastDay::from_raw(
                &entry.date,
                day.mintemp_f,
                day.maxtemp_f,
                day.avghumidity,
                day.condition.text,
                &day.condition.icon,
            )
            .map_err(|e| ForecastError::Parse(format!("invalid date '{}': {}", entry.date, e)))
        })
        .collect()
}

/// Formats an ISO date (`YYYY-MM-DD`) as a weekday line
///
/// `"2024-07-04"` becomes `"Thursday, July 04 2024"`.
pub fn format_weekday(date: &str) -> Result<String, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    Ok(date.format(WEEKDAY_FORMAT).to_string())
}

/// Formats a Fahrenheit temperature rounded to a whole degree
///
/// Halves round away from zero, so `68.5` becomes `"69°F"`.
pub fn format_temperature(fahrenheit: f64) -> String {
    format!("{}\u{00B0}F", round_to_whole(fahrenheit))
}

/// Formats a 0-100 humidity value as a whole percentage
pub fn format_humidity(humidity: f64) -> String {
    format!("{}%", round_to_whole(humidity))
}

/// Makes an icon path absolute by prefixing the `https:` scheme
///
/// Paths that already carry an http(s) scheme are returned unchanged.
pub fn absolute_icon_url(icon_path: &str) -> String {
    if icon_path.starts_with("https://") || icon_path.starts_with("http://") {
        icon_path.to_string()
    } else {
        format!("{}{}", ICON_SCHEME, icon_path)
    }
}

/// Rounds half away from zero; `-0.4` yields `0`, never `-0`
fn round_to_whole(value: f64) -> i64 {
    value.round() as i64
}

/// Forecast API response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast: ForecastBlock,
}

#[derive(Debug, Deserialize)]
struct ForecastBlock {
    forecastday: Vec<ForecastDayEntry>,
}

/// One element of the `forecastday` array
#[derive(Debug, Deserialize)]
struct ForecastDayEntry {
    date: String,
    day: DaySummary,
}

/// Daily aggregate values from the forecast API
#[derive(Debug, Deserialize)]
struct DaySummary {
    maxtemp_f: f64,
    mintemp_f: f64,
    avghumidity: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
    icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trimmed-down forecast response with three days
    const VALID_RESPONSE: &str = r#"{
        "location": { "name": "Boston", "region": "Massachusetts", "country": "USA" },
        "current": { "temp_f": 70.0 },
        "forecast": {
            "forecastday": [
                {
                    "date": "2024-07-04",
                    "date_epoch": 1720051200,
                    "day": {
                        "maxtemp_f": 84.2,
                        "mintemp_f": 68.4,
                        "avgtemp_f": 75.1,
                        "avghumidity": 73,
                        "condition": {
                            "text": "Patchy rain nearby",
                            "icon": "//cdn.weatherapi.com/weather/64x64/day/176.png",
                            "code": 1063
                        }
                    }
                },
                {
                    "date": "2024-07-05",
                    "day": {
                        "maxtemp_f": 88.5,
                        "mintemp_f": 70.5,
                        "avghumidity": 61.4,
                        "condition": {
                            "text": "Sunny",
                            "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png"
                        }
                    }
                },
                {
                    "date": "2024-07-06",
                    "day": {
                        "maxtemp_f": 79.0,
                        "mintemp_f": 66.0,
                        "avghumidity": 80,
                        "condition": {
                            "text": "Moderate rain",
                            "icon": "//cdn.weatherapi.com/weather/64x64/day/302.png"
                        }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_valid_response_keeps_source_order() {
        let days = parse_forecast(VALID_RESPONSE).expect("Should parse valid response");

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].weekday(), "Thursday, July 04 2024");
        assert_eq!(days[1].weekday(), "Friday, July 05 2024");
        assert_eq!(days[2].weekday(), "Saturday, July 06 2024");
    }

    #[test]
    fn test_parse_valid_response_formats_values() {
        let days = parse_forecast(VALID_RESPONSE).unwrap();
        let first = &days[0];

        assert_eq!(first.min_temp(), "68\u{00B0}F");
        assert_eq!(first.max_temp(), "84\u{00B0}F");
        assert_eq!(first.humidity(), "73%");
        assert_eq!(first.description(), "Patchy rain nearby");
        assert_eq!(
            first.icon_url(),
            "https://cdn.weatherapi.com/weather/64x64/day/176.png"
        );

        let second = &days[1];
        assert_eq!(second.min_temp(), "71\u{00B0}F");
        assert_eq!(second.max_temp(), "89\u{00B0}F");
        assert_eq!(second.humidity(), "61%");
    }

    #[test]
    fn test_parse_empty_forecast_array() {
        let body = r#"{ "forecast": { "forecastday": [] } }"#;
        let days = parse_forecast(body).unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn test_parse_missing_icon_is_parse_error() {
        let body = r#"{
            "forecast": { "forecastday": [
                { "date": "2024-07-04", "day": {
                    "maxtemp_f": 80, "mintemp_f": 60, "avghumidity": 50,
                    "condition": { "text": "Sunny", "icon": "//a/b.png" } } },
                { "date": "2024-07-05", "day": {
                    "maxtemp_f": 80, "mintemp_f": 60, "avghumidity": 50,
                    "condition": { "text": "Sunny" } } }
            ] }
        }"#;

        let result = parse_forecast(body);
        assert!(matches!(result, Err(ForecastError::Parse(_))));
    }

    #[test]
    fn test_parse_missing_forecast_object() {
        let body = r#"{ "error": { "code": 1006, "message": "No matching location found." } }"#;
        let result = parse_forecast(body);
        assert!(matches!(result, Err(ForecastError::Parse(_))));
    }

    #[test]
    fn test_parse_wrong_field_type() {
        let body = r#"{ "forecast": { "forecastday": [
            { "date": "2024-07-04", "day": {
                "maxtemp_f": "hot", "mintemp_f": 60, "avghumidity": 50,
                "condition": { "text": "Sunny", "icon": "//a/b.png" } } }
        ] } }"#;
        assert!(matches!(parse_forecast(body), Err(ForecastError::Parse(_))));
    }

    #[test]
    fn test_parse_invalid_date() {
        let body = r#"{ "forecast": { "forecastday": [
            { "date": "2024-13-45", "day": {
                "maxtemp_f": 80, "mintemp_f": 60, "avghumidity": 50,
                "condition": { "text": "Sunny", "icon": "//a/b.png" } } }
        ] } }"#;
        let err = parse_forecast(body).unwrap_err();
        assert!(err.to_string().contains("2024-13-45"));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_forecast("<html>Service Unavailable</html>"),
            Err(ForecastError::Parse(_))
        ));
    }

    #[test]
    fn test_format_weekday() {
        assert_eq!(format_weekday("2024-07-04").unwrap(), "Thursday, July 04 2024");
        assert_eq!(format_weekday("2025-01-01").unwrap(), "Wednesday, January 01 2025");
        assert!(format_weekday("not-a-date").is_err());
    }

    #[test]
    fn test_format_temperature_rounds_half_away_from_zero() {
        assert_eq!(format_temperature(68.4), "68\u{00B0}F");
        assert_eq!(format_temperature(68.5), "69\u{00B0}F");
        assert_eq!(format_temperature(68.6), "69\u{00B0}F");
        assert_eq!(format_temperature(-3.5), "-4\u{00B0}F");
        assert_eq!(format_temperature(-0.4), "0\u{00B0}F");
    }

    #[test]
    fn test_format_humidity() {
        assert_eq!(format_humidity(73.0), "73%");
        assert_eq!(format_humidity(0.0), "0%");
        assert_eq!(format_humidity(100.0), "100%");
        assert_eq!(format_humidity(54.5), "55%");
    }

    #[test]
    fn test_absolute_icon_url_prefixes_scheme() {
        assert_eq!(
            absolute_icon_url("//cdn.weatherapi.com/weather/64x64/night/113.png"),
            "https://cdn.weatherapi.com/weather/64x64/night/113.png"
        );
    }

    #[test]
    fn test_absolute_icon_url_keeps_existing_scheme() {
        assert_eq!(
            absolute_icon_url("http://127.0.0.1:8080/icons/113.png"),
            "http://127.0.0.1:8080/icons/113.png"
        );
        assert_eq!(
            absolute_icon_url("https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }
}
