//! Decoding of the `simpleWeather` response body.

use serde::Serialize;
use serde_json::Value;

use crate::error::WeatherError;

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "未知";
const NO_WIND_DIRECTION: &str = "无风向";
const NO_WIND_POWER: &str = "无风力";

/// Keyword → icon, checked in order; first hit wins.
const WEATHER_ICONS: &[(&str, &str)] = &[
    ("晴", "☀️"),
    ("多云", "⛅"),
    ("阴", "☁️"),
    ("小雨", "🌦️"),
    ("中雨", "🌧️"),
    ("大雨", "⛈️"),
    ("雪", "❄️"),
    ("雾", "🌫️"),
];

const DEFAULT_ICON: &str = "🌤️";

/// Current conditions plus today's forecast for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    /// Degrees Celsius, as reported.
    pub temperature: String,
    /// Relative humidity in percent, as reported.
    pub humidity: String,
    pub info: String,
    pub wind_direction: String,
    pub wind_power: String,
    /// Today's forecast range, e.g. `1/7℃`.
    pub today_range: String,
    pub today_weather: String,
    pub icon: &'static str,
}

/// Pick an icon for the current conditions or today's forecast.
pub fn weather_icon(info: &str, today_weather: &str) -> &'static str {
    WEATHER_ICONS
        .iter()
        .find(|(keyword, _)| info.contains(keyword) || today_weather.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// String or number at `key`, rendered as text.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a response body. `fallback_city` is used when the payload omits it.
pub fn parse_response(body: &str, fallback_city: &str) -> Result<WeatherReport, WeatherError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| WeatherError::Decode(format!("invalid JSON: {e}")))?;

    let code = json
        .get("error_code")
        .and_then(Value::as_i64)
        .ok_or_else(|| WeatherError::Decode("missing error_code".to_string()))?;
    if code != 0 {
        return Err(WeatherError::Api {
            code,
            reason: text(&json, "reason").unwrap_or_else(|| "未知错误".to_string()),
        });
    }

    let result = json.get("result").cloned().unwrap_or(Value::Null);
    let realtime = result.get("realtime").cloned().unwrap_or(Value::Null);
    let today = result
        .get("future")
        .and_then(Value::as_array)
        .and_then(|days| days.first())
        .cloned()
        .unwrap_or(Value::Null);

    // Older payloads nest wind inside `wid`; current ones use `direct`/`power`.
    let wid = realtime.get("wid").filter(|w| w.is_object());
    let wind_direction = text(&realtime, "direct")
        .or_else(|| wid.and_then(|w| text(w, "dir")))
        .unwrap_or_else(|| NO_WIND_DIRECTION.to_string());
    let wind_power = text(&realtime, "power")
        .or_else(|| wid.and_then(|w| text(w, "power")))
        .unwrap_or_else(|| NO_WIND_POWER.to_string());

    let info = text(&realtime, "info").unwrap_or_else(|| UNKNOWN.to_string());
    let today_weather = text(&today, "weather").unwrap_or_else(|| UNKNOWN.to_string());
    let icon = weather_icon(&info, &today_weather);

    Ok(WeatherReport {
        city: text(&result, "city").unwrap_or_else(|| fallback_city.to_string()),
        temperature: text(&realtime, "temperature").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        humidity: text(&realtime, "humidity").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        info,
        wind_direction,
        wind_power,
        today_range: text(&today, "temperature").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        today_weather,
        icon,
    })
}
