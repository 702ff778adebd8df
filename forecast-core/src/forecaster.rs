use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    city::City,
    config::Config,
    decode::{DecodedResult, try_decode},
    error::ForecastError,
    features::{self, FeatureVector},
    loader::{LoadedModel, ModelCache, ModelLoader, ModelSource},
    panel::ForecastPanel,
    predictor::Prediction,
};

/// What the user saw of the model when a prediction failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugContext {
    pub model_type: &'static str,
    pub features_shape: (usize, usize),
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// No predictor for this submission.
    #[error(transparent)]
    Load(ForecastError),

    #[error("{error}")]
    Predict { error: ForecastError, debug: DebugContext },
}

/// Everything one successful submission produced.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub city: City,
    pub date: NaiveDate,
    pub features: FeatureVector,
    #[serde(skip)]
    pub source: ModelSource,
    pub model_type: &'static str,
    pub prediction: Prediction,
    pub result: DecodedResult,
    pub panel: ForecastPanel,
    /// Warnings to show next to the panel (stub model, short output).
    pub warnings: Vec<String>,
}

#[derive(Debug)]
enum Models {
    Fresh(ModelLoader),
    Cached(ModelCache),
}

/// Runs submissions: load, build features, predict, decode, lay out.
#[derive(Debug)]
pub struct Forecaster {
    models: Models,
}

impl Forecaster {
    /// Loads the artifact again on every submission.
    pub fn new(loader: ModelLoader) -> Self {
        Self { models: Models::Fresh(loader) }
    }

    /// Keeps loaded artifacts between submissions.
    pub fn with_cache(loader: ModelLoader) -> Self {
        Self { models: Models::Cached(ModelCache::new(loader)) }
    }

    pub fn from_config(config: &Config) -> Self {
        let loader = ModelLoader::new(config.model_dir());
        if config.cache_models { Self::with_cache(loader) } else { Self::new(loader) }
    }

    pub fn loader(&self) -> &ModelLoader {
        match &self.models {
            Models::Fresh(loader) => loader,
            Models::Cached(cache) => cache.loader(),
        }
    }

    fn load(&mut self, city: City) -> Result<LoadedModel, ForecastError> {
        match &mut self.models {
            Models::Fresh(loader) => loader.load(city),
            Models::Cached(cache) => cache.get_or_load(city),
        }
    }

    pub fn submit(&mut self, city: City, date: NaiveDate) -> Result<ForecastReport, SubmitError> {
        info!(%city, %date, "prediction requested");

        let model = self.load(city).map_err(SubmitError::Load)?;
        let mut warnings: Vec<String> = model.warning().into_iter().collect();

        let features = features::build(date);
        let model_type = model.predictor.model_type();
        debug!(?features, model_type, "running prediction");

        let prediction = model.predictor.predict(&features).map_err(|error| SubmitError::Predict {
            error,
            debug: DebugContext { model_type, features_shape: features.shape(), prediction: None },
        })?;

        let result = match try_decode(&prediction, city) {
            Ok(forecast) => forecast.to_display_strings(),
            Err(e) => {
                warn!(%city, error = %e, "prediction output does not match city schema");
                warnings.push(format!("{e}. Showing default values."));
                DecodedResult::default()
            }
        };

        let panel = ForecastPanel::new(city, date, &result);

        Ok(ForecastReport {
            city,
            date,
            features,
            source: model.source,
            model_type,
            prediction,
            result,
            panel,
            warnings,
        })
    }
}
