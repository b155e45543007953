//! The assembled configuration registry.
//!
//! `PipelineConfig` is constructed once at process start (the shipped Ames
//! profile via `Default`, or a JSON snapshot via `io::read_config_json`) and
//! passed by reference to the pipeline stages that consume it. Nothing here
//! mutates after construction.

pub mod defaults;

use serde::{Deserialize, Serialize};

use crate::domain::{
    DiagnosticsConfig, ImputationPlan, ImputationRule, OutlierSet, ScreeningThresholds,
    StageToggles,
};
use crate::error::ConfigError;
use crate::models::{EnsembleWeights, GbrParams, RidgeParams};

/// Column names referenced from more than one place in the profile.
pub mod columns {
    /// Regression target.
    pub const SALE_PRICE: &str = "SalePrice";
    /// Grouping column for the lot-frontage median rule.
    pub const NEIGHBORHOOD: &str = "Neighborhood";
    /// Grouping column for the zoning sample rule; also a dtype override.
    pub const MS_SUB_CLASS: &str = "MSSubClass";
    /// Sale month; numeric in the raw data, categorical in meaning.
    pub const MO_SOLD: &str = "MoSold";
    /// Sale year; numeric in the raw data, categorical in meaning.
    pub const YR_SOLD: &str = "YrSold";
}

/// An immutable run configuration for the housing-price pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the target column.
    pub target: String,
    /// Gate for stdout echoes from the run log.
    pub verbose: bool,
    /// Per-column missing-value rules.
    pub plan: ImputationPlan,
    /// Curated training rows to drop before fitting.
    pub outliers: OutlierSet,
    /// Numeric columns whose values are categorical codes; coerced to
    /// strings before encoding.
    pub dtype_overrides: Vec<String>,
    pub diagnostics: DiagnosticsConfig,
    pub screening: ScreeningThresholds,
    /// Fold count for model evaluation.
    pub cv_folds: u32,
    /// Seed shared by every randomized stage.
    pub random_state: u64,
    pub stages: StageToggles,
    pub ridge: RidgeParams,
    pub gbr: GbrParams,
    pub weights: EnsembleWeights,
}

impl PipelineConfig {
    /// Exact-name rule lookup. `None` means the column gets the caller's
    /// default treatment.
    pub fn rule_for(&self, column: &str) -> Option<&ImputationRule> {
        self.plan.rule_for(column)
    }

    /// Fail-fast lookup variant.
    pub fn require_rule(&self, column: &str) -> Result<&ImputationRule, ConfigError> {
        self.plan.require_rule(column)
    }

    /// Whether a numeric column must be re-typed as categorical.
    pub fn is_categorical_override(&self, column: &str) -> bool {
        self.dtype_overrides.iter().any(|c| c == column)
    }

    /// Check the cross-field invariants a hand-edited snapshot could break.
    ///
    /// Ensemble weights are not re-checked: `EnsembleWeights` can only be
    /// built through its summing constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plan.check_unique()?;
        self.outliers.validate()?;
        self.ridge.validate()?;
        self.gbr.validate()?;
        if self.cv_folds < 2 {
            return Err(ConfigError::BadFoldCount(self.cv_folds));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    /// The shipped Ames profile.
    fn default() -> Self {
        defaults::ames_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_validates() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn absent_column_passes_through_or_fails_fast() {
        let config = PipelineConfig::default();

        // PoolQC is a real dataset column with no special handling.
        assert_eq!(config.rule_for("PoolQC"), None);
        let err = config.require_rule("PoolQC").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn(c) if c == "PoolQC"));
    }

    #[test]
    fn dtype_override_membership_is_exact() {
        let config = PipelineConfig::default();
        assert!(config.is_categorical_override(columns::MS_SUB_CLASS));
        assert!(config.is_categorical_override(columns::MO_SOLD));
        assert!(config.is_categorical_override(columns::YR_SOLD));
        assert!(!config.is_categorical_override("GrLivArea"));
        assert!(!config.is_categorical_override("mosold"));
    }

    #[test]
    fn validate_rejects_an_out_of_range_outlier_id() {
        let mut config = PipelineConfig::default();
        config.outliers.lists[1].row_ids.push(0);

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RowIdOutOfRange { id: 0, ref feature, .. } if feature == "GrLivArea"
        ));
    }

    #[test]
    fn validate_rejects_degenerate_model_settings() {
        let mut config = PipelineConfig::default();
        config.cv_folds = 1;
        assert!(matches!(config.validate().unwrap_err(), ConfigError::BadFoldCount(1)));

        let mut config = PipelineConfig::default();
        config.ridge.alphas.clear();
        assert!(matches!(config.validate().unwrap_err(), ConfigError::EmptyAlphas));

        let mut config = PipelineConfig::default();
        config.gbr.subsample = 0.0;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::BadFraction { name: "subsample", .. }
        ));
    }
}
