use serde::{Deserialize, Serialize};

use crate::{error::ForecastError, features::FeatureVector};

use super::{Prediction, Predictor};

/// Dense linear model read from a per-city artifact.
///
/// Each output is `weights[i] · features + bias[i]`. Outputs listed in
/// `categorical` are class codes and get rounded to the nearest integer.
///
/// JSON example:
/// ```json
/// { "weights": [[0.0, 0.0, 0.0]], "bias": [20.5], "categorical": [] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub categorical: Vec<usize>,
}

impl TrainedModel {
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>, categorical: Vec<usize>) -> Result<Self, String> {
        let model = Self { weights, bias, categorical };
        model.validate()?;
        Ok(model)
    }

    /// A model that returns `values` for every input.
    pub fn constant(values: &[f64]) -> Self {
        Self {
            weights: vec![vec![0.0; FeatureVector::WIDTH]; values.len()],
            bias: values.to_vec(),
            categorical: Vec::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        let model: Self = serde_json::from_str(text).map_err(|e| format!("JSON: {e}"))?;
        model.validate()?;
        Ok(model)
    }

    /// Older artifacts were written as TOML.
    pub fn from_legacy_toml(text: &str) -> Result<Self, String> {
        let model: Self = toml::from_str(text).map_err(|e| format!("TOML: {e}"))?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn outputs(&self) -> usize {
        self.bias.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.weights.is_empty() {
            return Err("model has no outputs".to_string());
        }
        if self.weights.len() != self.bias.len() {
            return Err(format!(
                "{} weight rows but {} bias terms",
                self.weights.len(),
                self.bias.len()
            ));
        }
        if let Some((i, row)) =
            self.weights.iter().enumerate().find(|(_, row)| row.len() != FeatureVector::WIDTH)
        {
            return Err(format!(
                "weight row {i} has {} coefficients, expected {}",
                row.len(),
                FeatureVector::WIDTH
            ));
        }
        if let Some(idx) = self.categorical.iter().find(|&&idx| idx >= self.outputs()) {
            return Err(format!("categorical output {idx} out of range"));
        }
        Ok(())
    }
}

impl Predictor for TrainedModel {
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ForecastError> {
        let x = features.as_array();

        let row = self
            .weights
            .iter()
            .zip(&self.bias)
            .enumerate()
            .map(|(i, (w, b))| {
                let value = w.iter().zip(x.iter()).map(|(w, x)| w * x).sum::<f64>() + b;
                if !value.is_finite() {
                    return Err(ForecastError::prediction(format!("output {i} is not finite")));
                }
                Ok(if self.categorical.contains(&i) { value.round() } else { value })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Prediction::Rows(vec![row]))
    }

    fn model_type(&self) -> &'static str {
        "TrainedModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FeatureVector {
        FeatureVector { year: 2026, month: 10, day: 19 }
    }

    #[test]
    fn predict_is_linear_in_features() {
        let model = TrainedModel::new(
            vec![vec![0.0, 1.0, 0.5], vec![0.001, 0.0, 0.0]],
            vec![1.0, 0.0],
            vec![],
        )
        .unwrap();

        let out = model.predict(&features()).unwrap().flatten();
        assert_eq!(out.len(), 2);
        assert!((out[0] - (10.0 + 9.5 + 1.0)).abs() < 1e-9);
        assert!((out[1] - 2.026).abs() < 1e-9);
    }

    #[test]
    fn categorical_outputs_are_rounded() {
        let model = TrainedModel::new(vec![vec![0.0, 0.0, 0.0]; 2], vec![3.7, 3.7], vec![1]).unwrap();
        assert_eq!(model.predict(&features()).unwrap().flatten(), vec![3.7, 4.0]);
    }

    #[test]
    fn reads_json() {
        let model = TrainedModel::from_json(
            r#"{ "weights": [[0.0, 0.0, 0.0]], "bias": [20.5] }"#,
        )
        .unwrap();
        assert_eq!(model, TrainedModel::constant(&[20.5]));
    }

    #[test]
    fn reads_legacy_toml() {
        let text = "weights = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]\nbias = [1.5, 2.0]\ncategorical = [1]\n";
        let model = TrainedModel::from_legacy_toml(text).unwrap();
        assert_eq!(model.outputs(), 2);
        assert_eq!(model.categorical, vec![1]);
    }

    #[test]
    fn rejects_wrong_feature_width() {
        let err = TrainedModel::new(vec![vec![1.0, 2.0]], vec![0.0], vec![]).unwrap_err();
        assert!(err.contains("expected 3"));
    }

    #[test]
    fn rejects_mismatched_bias() {
        let err = TrainedModel::new(vec![vec![0.0; 3]], vec![0.0, 1.0], vec![]).unwrap_err();
        assert!(err.contains("1 weight rows but 2 bias terms"));
    }

    #[test]
    fn rejects_out_of_range_categorical() {
        assert!(TrainedModel::new(vec![vec![0.0; 3]], vec![0.0], vec![1]).is_err());
    }

    #[test]
    fn non_finite_output_is_a_prediction_failure() {
        let model = TrainedModel::new(vec![vec![f64::MAX, 0.0, 0.0]], vec![0.0], vec![]).unwrap();
        let err = model.predict(&features()).unwrap_err();
        assert!(matches!(err, ForecastError::PredictionFailure { .. }));
    }
}
