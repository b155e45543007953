//! The shipped Ames profile.
//!
//! Values were tuned against the Kaggle "House Prices: Advanced Regression
//! Techniques" training set (1460 rows) and are kept as one literal table per
//! concern, in the order the pipeline applies them.

use crate::domain::{
    Aggregate, DiagnosticsConfig, ImputationPlan, ImputationRule, OutlierList, OutlierSet,
    PlanEntry, ScreeningThresholds, StageToggles,
};
use crate::models::{EnsembleWeights, GbrLoss, GbrParams, RidgeParams};
use crate::registry::{columns, PipelineConfig};

/// Seed shared by every randomized stage.
const RANDOM_STATE: u64 = 19260817;

/// Fold count for model evaluation.
const CV_FOLDS: u32 = 5;

/// Build the shipped profile.
///
/// # Panics
/// Panics if the literal tables below are inconsistent: a duplicated plan
/// column or a weight pair that does not sum to 1.0.
pub fn ames_profile() -> PipelineConfig {
    PipelineConfig {
        target: columns::SALE_PRICE.to_string(),
        verbose: false,
        plan: imputation_plan(),
        outliers: outlier_set(),
        dtype_overrides: vec![
            columns::MS_SUB_CLASS.to_string(),
            columns::MO_SOLD.to_string(),
            columns::YR_SOLD.to_string(),
        ],
        diagnostics: DiagnosticsConfig {
            display_correlation_figure: false,
            enable_outlier_discovery: false,
            display_target_histogram: false,
            print_skews: false,
            display_engineered_features: true,
        },
        screening: ScreeningThresholds {
            max_missing_rate: 0.8,
            min_monotonic_proportion: 0.91,
            min_dominant_proportion: 0.9994,
        },
        cv_folds: CV_FOLDS,
        random_state: RANDOM_STATE,
        stages: StageToggles {
            submit: true,
            ridge_eval: false,
            ridge_train: true,
            gbr_eval: false,
            gbr_train: true,
        },
        ridge: RidgeParams {
            alphas: vec![14.5],
            cv_folds: CV_FOLDS,
        },
        gbr: GbrParams {
            loss: GbrLoss::Huber,
            learning_rate: 0.03,
            n_estimators: 1000,
            min_samples_split: 10,
            min_samples_leaf: 5,
            random_state: RANDOM_STATE,
            subsample: 0.6,
            max_features: 0.3,
        },
        weights: EnsembleWeights::new(0.7, 0.3).expect("shipped weights sum to 1.0"),
    }
}

fn entry(column: &str, rule: ImputationRule) -> PlanEntry {
    PlanEntry {
        column: column.to_string(),
        rule,
    }
}

/// Per-column missing-value rules.
///
/// Garage and basement columns use sentinel constants: a missing garage is
/// "no garage", not an unknown one. The few genuinely unknown categoricals
/// are sampled from the observed distribution. LotFrontage and MSZoning vary
/// strongly with another column, so they fill within that grouping.
fn imputation_plan() -> ImputationPlan {
    let entries = vec![
        entry("GarageYrBlt", ImputationRule::number(0.0)),
        entry("GarageArea", ImputationRule::number(0.0)),
        entry("GarageCars", ImputationRule::number(0.0)),
        entry("GarageType", ImputationRule::text("None")),
        entry("GarageFinish", ImputationRule::text("None")),
        entry("GarageQual", ImputationRule::text("None")),
        entry("GarageCond", ImputationRule::text("None")),
        entry("BsmtQual", ImputationRule::text("None")),
        entry("BsmtCond", ImputationRule::text("None")),
        entry("BsmtExposure", ImputationRule::text("None")),
        entry("BsmtFinType1", ImputationRule::text("None")),
        entry("BsmtFinType2", ImputationRule::text("None")),
        entry("Functional", ImputationRule::text("Typ")),
        entry("Electrical", ImputationRule::text("SBrkr")),
        entry("KitchenQual", ImputationRule::text("TA")),
        entry("Exterior1st", ImputationRule::SampleObserved),
        entry("Exterior2nd", ImputationRule::SampleObserved),
        entry("SaleType", ImputationRule::SampleObserved),
        entry("Utilities", ImputationRule::text("None")),
        entry("MasVnrType", ImputationRule::text("None")),
        entry("MasVnrArea", ImputationRule::number(0.0)),
        entry("BsmtFinSF1", ImputationRule::number(0.0)),
        entry("BsmtFinSF2", ImputationRule::number(0.0)),
        entry("BsmtUnfSF", ImputationRule::number(0.0)),
        entry("TotalBsmtSF", ImputationRule::number(0.0)),
        entry("BsmtFullBath", ImputationRule::number(0.0)),
        entry("BsmtHalfBath", ImputationRule::number(0.0)),
        entry("FireplaceQu", ImputationRule::text("None")),
        entry(columns::SALE_PRICE, ImputationRule::number(0.0)),
        entry(
            "LotFrontage",
            ImputationRule::group(columns::NEIGHBORHOOD, Aggregate::Median),
        ),
        entry(
            "MSZoning",
            ImputationRule::group(columns::MS_SUB_CLASS, Aggregate::Random),
        ),
    ];

    ImputationPlan::new(entries).expect("shipped plan columns are unique")
}

/// Rows whose sale price visibly breaks the named feature's correlation with
/// the target. Row 1298 breaks two of them.
fn outlier_set() -> OutlierSet {
    OutlierSet {
        lists: vec![
            OutlierList {
                feature: "OverallQual".to_string(),
                correlation: 0.791,
                row_ids: vec![457, 691, 1182],
            },
            OutlierList {
                feature: "GrLivArea".to_string(),
                correlation: 0.709,
                row_ids: vec![523, 1298],
            },
            OutlierList {
                feature: "GarageArea".to_string(),
                correlation: 0.623,
                row_ids: vec![581, 1190, 1298, 1061],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ROW_ID_MAX, ROW_ID_MIN};

    #[test]
    fn shipped_plan_matches_the_tuned_table() {
        let plan = imputation_plan();
        assert_eq!(plan.len(), 31);

        // Order is part of the contract; group rules run last.
        let columns_in_order: Vec<&str> = plan.iter().map(|e| e.column.as_str()).collect();
        assert_eq!(columns_in_order[0], "GarageYrBlt");
        assert_eq!(columns_in_order[29], "LotFrontage");
        assert_eq!(columns_in_order[30], "MSZoning");

        assert_eq!(plan.rule_for("GarageYrBlt"), Some(&ImputationRule::number(0.0)));
        assert_eq!(plan.rule_for("GarageType"), Some(&ImputationRule::text("None")));
        assert_eq!(plan.rule_for("Functional"), Some(&ImputationRule::text("Typ")));
        assert_eq!(plan.rule_for("Electrical"), Some(&ImputationRule::text("SBrkr")));
        assert_eq!(plan.rule_for("KitchenQual"), Some(&ImputationRule::text("TA")));
        assert_eq!(plan.rule_for("Exterior1st"), Some(&ImputationRule::SampleObserved));
        assert_eq!(
            plan.rule_for("LotFrontage"),
            Some(&ImputationRule::group("Neighborhood", Aggregate::Median))
        );
        assert_eq!(
            plan.rule_for("MSZoning"),
            Some(&ImputationRule::group("MSSubClass", Aggregate::Random))
        );
    }

    #[test]
    fn shipped_plan_strategy_mix() {
        let plan = imputation_plan();

        let mut constant = 0;
        let mut sampled = 0;
        let mut grouped = 0;
        for entry in plan.iter() {
            match &entry.rule {
                ImputationRule::Constant { .. } => constant += 1,
                ImputationRule::SampleObserved => sampled += 1,
                ImputationRule::GroupAggregate { .. } => grouped += 1,
            }
        }

        assert_eq!(
            (constant, sampled, grouped),
            (26, 3, 2),
            "constant/sampled/grouped mix changed"
        );
    }

    #[test]
    fn shipped_outliers_are_in_range_and_annotated() {
        let set = outlier_set();
        assert_eq!(set.lists.len(), 3);
        assert!(set.validate().is_ok());

        let features: Vec<&str> = set.lists.iter().map(|l| l.feature.as_str()).collect();
        assert_eq!(features, vec!["OverallQual", "GrLivArea", "GarageArea"]);

        let correlations: Vec<f64> = set.lists.iter().map(|l| l.correlation).collect();
        assert_eq!(correlations, vec![0.791, 0.709, 0.623]);

        for list in &set.lists {
            for &id in &list.row_ids {
                assert!(
                    (ROW_ID_MIN..=ROW_ID_MAX).contains(&id),
                    "row id {id} out of range in {}",
                    list.feature
                );
            }
        }
    }

    #[test]
    fn shipped_outlier_union_dedups_row_1298() {
        let set = outlier_set();
        let raw: usize = set.lists.iter().map(|l| l.row_ids.len()).sum();
        assert_eq!(raw, 9);

        let union = set.all_row_ids();
        assert_eq!(union, vec![457, 523, 581, 691, 1061, 1182, 1190, 1298]);
    }

    #[test]
    fn shipped_weights_sum_exactly_to_one() {
        let config = ames_profile();
        assert_eq!(config.weights.ridge() + config.weights.gbr(), 1.0);
        assert_eq!(config.weights.ridge(), 0.7);
        assert_eq!(config.weights.gbr(), 0.3);
    }

    #[test]
    fn shipped_seeds_and_folds_are_mirrored() {
        let config = ames_profile();
        assert_eq!(config.random_state, 19260817);
        assert_eq!(config.gbr.random_state, config.random_state);
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.ridge.cv_folds, config.cv_folds);
    }

    #[test]
    fn shipped_toggles_and_thresholds() {
        let config = ames_profile();

        assert_eq!(config.target, "SalePrice");
        assert!(!config.verbose);

        assert!(!config.diagnostics.display_correlation_figure);
        assert!(config.diagnostics.display_engineered_features);

        assert_eq!(config.screening.max_missing_rate, 0.8);
        assert_eq!(config.screening.min_monotonic_proportion, 0.91);
        assert_eq!(config.screening.min_dominant_proportion, 0.9994);

        assert!(config.stages.submit);
        assert!(!config.stages.ridge_eval);
        assert!(config.stages.ridge_train);
        assert!(!config.stages.gbr_eval);
        assert!(config.stages.gbr_train);

        assert_eq!(config.ridge.alphas, vec![14.5]);
        assert_eq!(config.gbr.loss, GbrLoss::Huber);
        assert_eq!(config.gbr.n_estimators, 1000);
    }
}
