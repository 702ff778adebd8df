//! Turns raw predictor output into labelled, unit-suffixed display strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::warn;

use crate::{city::City, error::ForecastError, predictor::Prediction};

/// Field keys shared with the result panel.
pub mod keys {
    pub const RAIN: &str = "rain";
    pub const MAX_TEMP: &str = "max_temp";
    pub const AVG_TEMP: &str = "avg_temp";
    pub const MIN_TEMP: &str = "min_temp";
    pub const HUMIDITY: &str = "humidity";
    pub const WIND: &str = "wind";
    pub const EVENT: &str = "event";
}

/// Weather event predicted by the Austin classifier head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherEvent {
    Clear,
    Cloudy,
    Rain,
    Thunderstorm,
    Fog,
    Snow,
    Drizzle,
}

impl WeatherEvent {
    pub const fn all() -> &'static [WeatherEvent] {
        &[
            WeatherEvent::Clear,
            WeatherEvent::Cloudy,
            WeatherEvent::Rain,
            WeatherEvent::Thunderstorm,
            WeatherEvent::Fog,
            WeatherEvent::Snow,
            WeatherEvent::Drizzle,
        ]
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::all().get(i)).copied()
    }

    /// Truncate a raw model value to a code and look it up. Anything outside
    /// the table reads as fog.
    pub fn from_raw(value: f64) -> Self {
        if !value.is_finite() {
            return WeatherEvent::Fog;
        }
        Self::from_code(value.trunc() as i64).unwrap_or(WeatherEvent::Fog)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherEvent::Clear => "Clear",
            WeatherEvent::Cloudy => "Cloudy",
            WeatherEvent::Rain => "Rain",
            WeatherEvent::Thunderstorm => "Thunderstorm",
            WeatherEvent::Fog => "Fog",
            WeatherEvent::Snow => "Snow",
            WeatherEvent::Drizzle => "Drizzle",
        }
    }
}

/// Label for an event code, "Fog" when the code is unknown.
pub fn event_label(code: i64) -> &'static str {
    WeatherEvent::from_code(code).unwrap_or(WeatherEvent::Fog).label()
}

/// Field key to display string. Empty when the output could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedResult {
    fields: BTreeMap<String, String>,
}

impl DecodedResult {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: String) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<const N: usize> From<[(&str, &str); N]> for DecodedResult {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut result = DecodedResult::default();
        for (k, v) in pairs {
            result.insert(k, v.to_string());
        }
        result
    }
}

fn celsius(v: f64) -> String {
    format!("{v:.2}°C")
}

fn percent(v: f64) -> String {
    format!("{v:.2}%")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AustinForecast {
    pub max_temp_c: f64,
    pub avg_temp_c: f64,
    pub min_temp_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mph: f64,
    pub event: WeatherEvent,
}

impl AustinForecast {
    pub const WIDTH: usize = 6;

    pub fn from_values(values: &[f64]) -> Result<Self, ForecastError> {
        match values {
            [max, avg, min, humidity, wind, event, ..] => Ok(Self {
                max_temp_c: *max,
                avg_temp_c: *avg,
                min_temp_c: *min,
                humidity_pct: *humidity,
                wind_speed_mph: *wind,
                event: WeatherEvent::from_raw(*event),
            }),
            _ => Err(ForecastError::ShapeMismatch {
                city: City::Austin,
                expected: Self::WIDTH,
                actual: values.len(),
            }),
        }
    }

    pub fn to_display_strings(&self) -> DecodedResult {
        let mut out = DecodedResult::default();
        out.insert(keys::MAX_TEMP, celsius(self.max_temp_c));
        out.insert(keys::AVG_TEMP, celsius(self.avg_temp_c));
        out.insert(keys::MIN_TEMP, celsius(self.min_temp_c));
        out.insert(keys::HUMIDITY, percent(self.humidity_pct));
        out.insert(keys::WIND, format!("{:.2} MPH", self.wind_speed_mph));
        out.insert(keys::EVENT, self.event.label().to_string());
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BengaluruForecast {
    pub rain_pct: f64,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
}

impl BengaluruForecast {
    pub const WIDTH: usize = 5;

    pub fn from_values(values: &[f64]) -> Result<Self, ForecastError> {
        match values {
            [rain, max, min, humidity, wind, ..] => Ok(Self {
                rain_pct: *rain,
                max_temp_c: *max,
                min_temp_c: *min,
                humidity_pct: *humidity,
                wind_speed_kmh: *wind,
            }),
            _ => Err(ForecastError::ShapeMismatch {
                city: City::Bengaluru,
                expected: Self::WIDTH,
                actual: values.len(),
            }),
        }
    }

    pub fn to_display_strings(&self) -> DecodedResult {
        let mut out = DecodedResult::default();
        out.insert(keys::RAIN, percent(self.rain_pct));
        out.insert(keys::MAX_TEMP, celsius(self.max_temp_c));
        out.insert(keys::MIN_TEMP, celsius(self.min_temp_c));
        out.insert(keys::HUMIDITY, percent(self.humidity_pct));
        out.insert(keys::WIND, format!("{:.2} km/h", self.wind_speed_kmh));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "city")]
pub enum Forecast {
    Austin(AustinForecast),
    Bengaluru(BengaluruForecast),
}

impl Forecast {
    pub fn to_display_strings(&self) -> DecodedResult {
        match self {
            Forecast::Austin(f) => f.to_display_strings(),
            Forecast::Bengaluru(f) => f.to_display_strings(),
        }
    }
}

/// Decode into a typed record, failing when the output is shorter than the
/// city's schema.
pub fn try_decode(prediction: &Prediction, city: City) -> Result<Forecast, ForecastError> {
    let values = prediction.flatten();
    match city {
        City::Austin => AustinForecast::from_values(&values).map(Forecast::Austin),
        _ => BengaluruForecast::from_values(&values).map(Forecast::Bengaluru),
    }
}

/// Decode into display strings. A short output yields an empty result and the
/// panel falls back to its defaults.
pub fn decode(prediction: &Prediction, city: City) -> DecodedResult {
    match try_decode(prediction, city) {
        Ok(forecast) => forecast.to_display_strings(),
        Err(e) => {
            warn!(%city, error = %e, "prediction output does not match city schema");
            DecodedResult::default()
        }
    }
}
