use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{error::ForecastError, features::FeatureVector};

pub mod stub;
pub mod trained;

pub use stub::StubModel;
pub use trained::TrainedModel;

/// Raw numeric output of a predictor. Trained models answer with one row per
/// input sample, the decoder flattens before reading values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Flat(Vec<f64>),
    Rows(Vec<Vec<f64>>),
}

impl Prediction {
    /// Row-major flattening to one dimension.
    pub fn flatten(&self) -> Vec<f64> {
        match self {
            Prediction::Flat(values) => values.clone(),
            Prediction::Rows(rows) => rows.iter().flatten().copied().collect(),
        }
    }

    /// Total number of values across all rows.
    pub fn len(&self) -> usize {
        match self {
            Prediction::Flat(values) => values.len(),
            Prediction::Rows(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for Prediction {
    fn from(values: Vec<f64>) -> Self {
        Prediction::Flat(values)
    }
}

/// Anything that turns a feature vector into a prediction. The decoder does not
/// care which implementation produced the output.
pub trait Predictor: Send + Sync + Debug {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ForecastError>;

    /// Short type name shown in debug output when a prediction fails.
    fn model_type(&self) -> &'static str;
}
