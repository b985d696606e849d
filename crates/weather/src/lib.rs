//! Weather lookup for the daily push.
//!
//! Queries the Juhe `simpleWeather` API for the configured city and
//! condenses the response into a [`WeatherReport`] ready for templating.

pub mod client;
pub mod error;
pub mod report;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use report::{parse_response, weather_icon, WeatherReport};
