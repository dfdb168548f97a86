//! Temperature conversion and the final report returned to clients.

use serde::{Deserialize, Serialize};

/// Current temperature reading from the weather provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub temperature_celsius: f64,
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.0
}

/// Response body of a successful lookup.
///
/// Only [`TemperatureReport::new`] builds one, so the Fahrenheit and Kelvin
/// values always agree with the Celsius reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureReport {
    pub fn new(city: impl Into<String>, sample: WeatherSample) -> Self {
        let celsius = sample.temperature_celsius;
        Self {
            city: city.into(),
            temp_c: celsius,
            temp_f: celsius_to_fahrenheit(celsius),
            temp_k: celsius_to_kelvin(celsius),
        }
    }
}
