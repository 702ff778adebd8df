//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Cities and their model artifacts
//! - Date-derived feature vectors
//! - The predictor capability (trained artifact or stub fallback)
//! - Decoding of raw model output into display strings
//! - The result panel and the submission pipeline
//! - Configuration handling
//!
//! It is used by `forecast-cli`, but can also be reused by other front-ends.

pub mod city;
pub mod config;
pub mod decode;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod loader;
pub mod panel;
pub mod predictor;

pub use city::City;
pub use config::Config;
pub use decode::{AustinForecast, BengaluruForecast, DecodedResult, Forecast, WeatherEvent, decode};
pub use error::ForecastError;
pub use features::{DateWindow, FeatureVector};
pub use forecaster::{DebugContext, ForecastReport, Forecaster, SubmitError};
pub use loader::{LoadedModel, ModelCache, ModelLoader, ModelSource};
pub use panel::ForecastPanel;
pub use predictor::{Prediction, Predictor, StubModel, TrainedModel};
