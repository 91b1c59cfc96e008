//! Classifiers scoring how likely a candidate is a real date.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::features::{FeatureConfig, FeatureVector};
use crate::ModelError;

/// Scores feature vectors as dates versus false positives.
///
/// Implementations are read-only once built, so one instance can serve any
/// number of extraction runs.
pub trait DateClassifier {
    /// The feature layout the classifier was trained on.
    fn feature_config(&self) -> &FeatureConfig;

    /// Probability in `[0, 1]` that the vector describes a real date.
    ///
    /// `features` must have been extracted with [`DateClassifier::feature_config`].
    /// [`LogisticModel`] panics when the vector width does not match.
    fn score(&self, features: &FeatureVector) -> f64;
}

impl<T: DateClassifier + ?Sized> DateClassifier for &T {
    fn feature_config(&self) -> &FeatureConfig {
        (**self).feature_config()
    }

    fn score(&self, features: &FeatureVector) -> f64 {
        (**self).score(features)
    }
}

/// On-disk form of a [`LogisticModel`].
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    version: u32,
    #[serde(default)]
    features: FeatureConfig,
    intercept: f64,
    #[serde(default)]
    weights: BTreeMap<String, f64>,
}

/// Logistic regression over a [`FeatureVector`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    version: u32,
    features: FeatureConfig,
    intercept: f64,
    /// One weight per column, in canonical column order.
    weights: Vec<f64>,
}

impl LogisticModel {
    /// Build a model from named weights. Columns without a weight weigh zero.
    pub fn new<I, S>(features: FeatureConfig, intercept: f64, weights: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        features.validate()?;
        let columns: HashMap<String, usize> = features
            .columns()
            .into_iter()
            .enumerate()
            .map(|(ix, column)| (column, ix))
            .collect();

        let mut dense = vec![0.0; features.width()];
        for (column, weight) in weights {
            let column = column.as_ref();
            let ix = columns
                .get(column)
                .ok_or_else(|| ModelError::UnknownColumn {
                    column: column.to_string(),
                })?;
            dense[*ix] = weight;
        }

        Ok(Self {
            version: 0,
            features,
            intercept,
            weights: dense,
        })
    }

    /// Parse a RON model artifact.
    pub fn from_ron_str(source: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = ron::from_str(source).map_err(|e| ModelError::Parse {
            message: e.to_string(),
        })?;
        let mut model = Self::new(artifact.features, artifact.intercept, artifact.weights)?;
        model.version = artifact.version;
        Ok(model)
    }

    /// Read and parse a RON model artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_ron_str(&source)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl DateClassifier for LogisticModel {
    fn feature_config(&self) -> &FeatureConfig {
        &self.features
    }

    fn score(&self, features: &FeatureVector) -> f64 {
        assert_eq!(
            features.len(),
            self.weights.len(),
            "feature vector does not match the model's column layout"
        );
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum();
        logistic(self.intercept + dot)
    }
}

static DEFAULT_MODEL: Lazy<Result<LogisticModel, ModelError>> =
    Lazy::new(|| LogisticModel::from_ron_str(include_str!("../models/date_model.ron")));

/// The bundled model, parsed on first use and shared afterwards.
pub fn default_model() -> Result<&'static LogisticModel, ModelError> {
    DEFAULT_MODEL.as_ref().map_err(Clone::clone)
}
