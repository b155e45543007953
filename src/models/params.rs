//! Base-model hyperparameters, derived search grids, and the blend weights.
//!
//! Two base models feed the final blend: a cross-validated ridge regression
//! and a gradient-boosted regressor. The fixed parameter sets here are the
//! single source of truth; grid-search candidate lists are derived from them
//! (`search_grid`), so a fixed value and its grid entry can never drift apart.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerance for the ensemble sum-to-one check. Covers float error in
/// computed weight pairs; the shipped pair sums to exactly 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-12;

/// Loss functions the gradient-boosted regressor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GbrLoss {
    /// Squared error with a linear tail; dampens the sale-price outliers.
    Huber,
    SquaredError,
    AbsoluteError,
    Quantile,
}

impl GbrLoss {
    /// Spelling used in grids and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            GbrLoss::Huber => "huber",
            GbrLoss::SquaredError => "squared_error",
            GbrLoss::AbsoluteError => "absolute_error",
            GbrLoss::Quantile => "quantile",
        }
    }
}

/// Cross-validated ridge regression hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeParams {
    /// Regularization strength candidates evaluated by the inner CV.
    pub alphas: Vec<f64>,
    /// Fold count for the inner cross-validation.
    pub cv_folds: u32,
}

impl RidgeParams {
    /// Derive the search grid from the fixed values: one candidate per alpha.
    pub fn search_grid(&self) -> ParamGrid {
        ParamGrid {
            entries: vec![GridEntry {
                name: "alphas".to_string(),
                candidates: self.alphas.iter().map(|&a| ParamValue::Float(a)).collect(),
            }],
        }
    }

    /// Reject an empty candidate list or a degenerate fold count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphas.is_empty() {
            return Err(ConfigError::EmptyAlphas);
        }
        if self.cv_folds < 2 {
            return Err(ConfigError::BadFoldCount(self.cv_folds));
        }
        Ok(())
    }
}

/// Gradient-boosted regressor hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbrParams {
    pub loss: GbrLoss,
    /// Shrinkage applied to each stage's contribution, in (0, 1].
    pub learning_rate: f64,
    pub n_estimators: u32,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
    /// Seed for the booster's internal subsampling.
    pub random_state: u64,
    /// Row fraction drawn for each boosting stage.
    pub subsample: f64,
    /// Feature fraction considered at each split.
    pub max_features: f64,
}

impl GbrParams {
    /// Derive the search grid from the fixed values: one single-candidate
    /// entry per parameter, in declaration order.
    pub fn search_grid(&self) -> ParamGrid {
        ParamGrid {
            entries: vec![
                GridEntry {
                    name: "loss".to_string(),
                    candidates: vec![ParamValue::Text(self.loss.as_str().to_string())],
                },
                GridEntry {
                    name: "learning_rate".to_string(),
                    candidates: vec![ParamValue::Float(self.learning_rate)],
                },
                GridEntry {
                    name: "n_estimators".to_string(),
                    candidates: vec![ParamValue::Int(u64::from(self.n_estimators))],
                },
                GridEntry {
                    name: "min_samples_split".to_string(),
                    candidates: vec![ParamValue::Int(u64::from(self.min_samples_split))],
                },
                GridEntry {
                    name: "min_samples_leaf".to_string(),
                    candidates: vec![ParamValue::Int(u64::from(self.min_samples_leaf))],
                },
                GridEntry {
                    name: "random_state".to_string(),
                    candidates: vec![ParamValue::Int(self.random_state)],
                },
                GridEntry {
                    name: "subsample".to_string(),
                    candidates: vec![ParamValue::Float(self.subsample)],
                },
                GridEntry {
                    name: "max_features".to_string(),
                    candidates: vec![ParamValue::Float(self.max_features)],
                },
            ],
        }
    }

    /// Reject rates and fractions outside (0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("learning_rate", self.learning_rate)?;
        check_fraction("subsample", self.subsample)?;
        check_fraction("max_features", self.max_features)?;
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0 && value <= 1.0) {
        return Err(ConfigError::BadFraction { name, value });
    }
    Ok(())
}

/// A single grid-search candidate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(u64),
    Float(f64),
    Text(String),
}

/// One parameter's candidate list in a search grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridEntry {
    pub name: String,
    pub candidates: Vec<ParamValue>,
}

/// Ordered candidate lists for one model's grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamGrid {
    entries: Vec<GridEntry>,
}

impl ParamGrid {
    /// Candidates for one parameter, if the grid carries it.
    pub fn candidates_for(&self, name: &str) -> Option<&[ParamValue]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.candidates.as_slice())
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &GridEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Linear blend weights for the two base models' predictions.
///
/// Constructed through `new`, which requires the pair to sum to 1.0, so a
/// blend is always an average of the two predictions rather than a rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct EnsembleWeights {
    ridge: f64,
    gbr: f64,
}

impl EnsembleWeights {
    pub fn new(ridge: f64, gbr: f64) -> Result<Self, ConfigError> {
        let sum_ok =
            ridge.is_finite() && gbr.is_finite() && (ridge + gbr - 1.0).abs() <= WEIGHT_SUM_TOLERANCE;
        if !sum_ok {
            return Err(ConfigError::BadWeights { ridge, gbr });
        }
        Ok(EnsembleWeights { ridge, gbr })
    }

    pub fn ridge(&self) -> f64 {
        self.ridge
    }

    pub fn gbr(&self) -> f64 {
        self.gbr
    }

    /// Blend one prediction pair.
    pub fn blend(&self, ridge_pred: f64, gbr_pred: f64) -> f64 {
        self.ridge * ridge_pred + self.gbr * gbr_pred
    }

    /// Blend two equal-length prediction slices element-wise.
    pub fn blend_slices(&self, ridge_preds: &[f64], gbr_preds: &[f64]) -> Result<Vec<f64>, ConfigError> {
        if ridge_preds.len() != gbr_preds.len() {
            return Err(ConfigError::LengthMismatch {
                left: ridge_preds.len(),
                right: gbr_preds.len(),
            });
        }
        Ok(ridge_preds
            .iter()
            .zip(gbr_preds)
            .map(|(&r, &g)| self.blend(r, g))
            .collect())
    }
}

/// Serde-facing shape of `EnsembleWeights`; deserialization re-runs the
/// sum-to-one check through `TryFrom`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawWeights {
    ridge: f64,
    gbr: f64,
}

impl TryFrom<RawWeights> for EnsembleWeights {
    type Error = ConfigError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        EnsembleWeights::new(raw.ridge, raw.gbr)
    }
}

impl From<EnsembleWeights> for RawWeights {
    fn from(weights: EnsembleWeights) -> Self {
        RawWeights {
            ridge: weights.ridge,
            gbr: weights.gbr,
        }
    }
}
