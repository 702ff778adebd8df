use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, error, warn};

use crate::{
    city::City,
    error::ForecastError,
    predictor::{Predictor, StubModel, TrainedModel},
};

/// Where the predictor of a [`LoadedModel`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Artifact(PathBuf),
    /// No artifact at `missing`; fixed demo values are served instead.
    Stub { missing: PathBuf },
}

#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub city: City,
    pub source: ModelSource,
    pub predictor: Arc<dyn Predictor>,
}

impl LoadedModel {
    pub fn is_stub(&self) -> bool {
        matches!(self.source, ModelSource::Stub { .. })
    }

    /// User-facing warning for a stub fallback.
    pub fn warning(&self) -> Option<String> {
        match &self.source {
            ModelSource::Stub { missing } => Some(format!(
                "Model file not found: {}. Showing demo values for {}.",
                missing.display(),
                self.city
            )),
            ModelSource::Artifact(_) => None,
        }
    }
}

/// Resolves and reads per-city model artifacts from one directory.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    model_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self { model_dir: model_dir.into() }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn artifact_path(&self, city: City) -> PathBuf {
        self.model_dir.join(city.artifact_file_name())
    }

    /// Load the predictor for `city`, falling back to a [`StubModel`] when
    /// the artifact does not exist.
    pub fn load(&self, city: City) -> Result<LoadedModel, ForecastError> {
        let path = self.artifact_path(city);
        debug!(%city, path = %path.display(), "resolving model artifact");

        match load_trained(&path) {
            Ok(model) => Ok(LoadedModel {
                city,
                source: ModelSource::Artifact(path),
                predictor: Arc::new(model),
            }),
            Err(ForecastError::ArtifactMissing { path }) => {
                warn!(%city, path = %path.display(), "model file not found, using stub model");
                Ok(LoadedModel {
                    city,
                    source: ModelSource::Stub { missing: path },
                    predictor: Arc::new(StubModel::new(city)),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Same as [`ModelLoader::load`], but reports the failure and hands back
    /// nothing, so the caller cannot go on to predict.
    pub fn load_or_report(&self, city: City) -> Option<LoadedModel> {
        match self.load(city) {
            Ok(model) => Some(model),
            Err(e) => {
                error!(%city, error = %e, "error loading model");
                None
            }
        }
    }
}

/// Read a trained model, trying the JSON format first and the legacy TOML
/// format second.
pub fn load_trained(path: &Path) -> Result<TrainedModel, ForecastError> {
    if !path.exists() {
        return Err(ForecastError::ArtifactMissing { path: path.to_path_buf() });
    }

    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::InvalidData => ForecastError::ArtifactCorrupt {
            path: path.to_path_buf(),
            reason: "file is not valid UTF-8".to_string(),
        },
        _ => ForecastError::Io { path: path.to_path_buf(), source },
    })?;

    let primary = match TrainedModel::from_json(&text) {
        Ok(model) => return Ok(model),
        Err(e) => e,
    };
    debug!(path = %path.display(), error = %primary, "primary format failed, trying legacy format");

    TrainedModel::from_legacy_toml(&text).map_err(|legacy| ForecastError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason: format!("{primary}; {legacy}"),
    })
}

/// Keeps loaded artifacts per city for the lifetime of a session.
///
/// Stub fallbacks are not kept, so an artifact dropped into the model
/// directory is picked up by the next submission.
#[derive(Debug)]
pub struct ModelCache {
    loader: ModelLoader,
    entries: HashMap<City, LoadedModel>,
}

impl ModelCache {
    pub fn new(loader: ModelLoader) -> Self {
        Self { loader, entries: HashMap::new() }
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    pub fn get_or_load(&mut self, city: City) -> Result<LoadedModel, ForecastError> {
        if let Some(hit) = self.entries.get(&city) {
            debug!(%city, "model cache hit");
            return Ok(hit.clone());
        }

        let loaded = self.loader.load(city)?;
        if !loaded.is_stub() {
            self.entries.insert(city, loaded.clone());
        }
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use tempfile::TempDir;

    fn features() -> FeatureVector {
        FeatureVector { year: 2026, month: 10, day: 19 }
    }

    fn write_artifact(dir: &TempDir, city: City, text: &str) -> PathBuf {
        let path = dir.path().join(city.artifact_file_name());
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn missing_artifact_falls_back_to_stub_of_right_width() {
        let tmp = TempDir::new().unwrap();
        let loader = ModelLoader::new(tmp.path());

        for city in City::all() {
            let loaded = loader.load(*city).expect("missing artifact never errors");
            assert!(loaded.is_stub());
            assert_eq!(loaded.predictor.model_type(), "StubModel");
            let out = loaded.predictor.predict(&features()).unwrap();
            assert_eq!(out.len(), city.output_width());
            assert!(loaded.warning().unwrap().contains(&city.artifact_file_name()));
        }
    }

    #[test]
    fn loads_json_artifact() {
        let tmp = TempDir::new().unwrap();
        let model = TrainedModel::constant(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let path = write_artifact(&tmp, City::Bengaluru, &model.to_json_pretty().unwrap());

        let loaded = ModelLoader::new(tmp.path()).load(City::Bengaluru).unwrap();
        assert_eq!(loaded.source, ModelSource::Artifact(path));
        assert_eq!(loaded.predictor.model_type(), "TrainedModel");
        assert_eq!(
            loaded.predictor.predict(&features()).unwrap().flatten(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert!(loaded.warning().is_none());
    }

    #[test]
    fn loads_legacy_toml_artifact() {
        let tmp = TempDir::new().unwrap();
        write_artifact(
            &tmp,
            City::Austin,
            "weights = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]\nbias = [7.0, 8.0]\n",
        );

        let loaded = ModelLoader::new(tmp.path()).load(City::Austin).unwrap();
        assert!(!loaded.is_stub());
        assert_eq!(loaded.predictor.predict(&features()).unwrap().flatten(), vec![7.0, 8.0]);
    }

    #[test]
    fn corrupt_artifact_is_reported() {
        let tmp = TempDir::new().unwrap();
        write_artifact(&tmp, City::Austin, "definitely not a model");
        let loader = ModelLoader::new(tmp.path());

        let err = loader.load(City::Austin).unwrap_err();
        match err {
            ForecastError::ArtifactCorrupt { reason, .. } => {
                assert!(reason.contains("JSON"));
                assert!(reason.contains("TOML"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(loader.load_or_report(City::Austin).is_none());
    }

    #[test]
    fn invalid_model_shape_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        write_artifact(&tmp, City::Bengaluru, r#"{ "weights": [[1.0]], "bias": [0.0] }"#);

        let err = ModelLoader::new(tmp.path()).load(City::Bengaluru).unwrap_err();
        assert!(matches!(err, ForecastError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn cache_reuses_loaded_artifact() {
        let tmp = TempDir::new().unwrap();
        write_artifact(&tmp, City::Austin, &TrainedModel::constant(&[1.0; 6]).to_json_pretty().unwrap());
        let mut cache = ModelCache::new(ModelLoader::new(tmp.path()));

        let first = cache.get_or_load(City::Austin).unwrap();
        let second = cache.get_or_load(City::Austin).unwrap();
        assert!(Arc::ptr_eq(&first.predictor, &second.predictor));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_does_not_keep_stubs() {
        let tmp = TempDir::new().unwrap();
        let mut cache = ModelCache::new(ModelLoader::new(tmp.path()));

        assert!(cache.get_or_load(City::Bengaluru).unwrap().is_stub());
        assert!(cache.is_empty());

        write_artifact(&tmp, City::Bengaluru, &TrainedModel::constant(&[0.0; 5]).to_json_pretty().unwrap());
        assert!(!cache.get_or_load(City::Bengaluru).unwrap().is_stub());
    }
}
