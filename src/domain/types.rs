//! Shared configuration schema types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - consulted in-memory by the training pipeline
//! - exported as a JSON snapshot next to a run's artifacts
//! - reloaded later to reproduce a run

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// First valid row id in the training set (ids are 1-based).
pub const ROW_ID_MIN: u32 = 1;

/// Last valid row id in the training set.
pub const ROW_ID_MAX: u32 = 1460;

/// The fill value carried by a `Constant` rule.
///
/// Numeric columns take `Number`, categorical columns take `Text`
/// (e.g. `0` for a missing garage area, `"None"` for a missing garage type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImputeValue {
    Number(f64),
    Text(String),
}

/// Aggregate functions a group-wise rule may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Middle observed value; even counts take the mean of the two middles.
    Median,
    /// Uniform draw from the observed values.
    Random,
}

/// Missing-value strategy for one column.
///
/// Each variant carries exactly the fields its strategy needs, so an invalid
/// combination (say, a group aggregate without a grouping column) cannot be
/// constructed in the first place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ImputationRule {
    /// Replace missing entries with a fixed value.
    Constant { value: ImputeValue },
    /// Replace missing entries by sampling the column's observed values.
    SampleObserved,
    /// Replace missing entries with an aggregate computed within the group
    /// defined by another column.
    GroupAggregate { group_by: String, aggregate: Aggregate },
}

impl ImputationRule {
    /// Constant rule filling with a number.
    pub fn number(value: f64) -> Self {
        ImputationRule::Constant {
            value: ImputeValue::Number(value),
        }
    }

    /// Constant rule filling with a category label.
    pub fn text(value: impl Into<String>) -> Self {
        ImputationRule::Constant {
            value: ImputeValue::Text(value.into()),
        }
    }

    /// Group-aggregate rule over the given grouping column.
    pub fn group(group_by: impl Into<String>, aggregate: Aggregate) -> Self {
        ImputationRule::GroupAggregate {
            group_by: group_by.into(),
            aggregate,
        }
    }
}

/// One column's entry in the imputation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub column: String,
    pub rule: ImputationRule,
}

/// Ordered per-column missing-value rules, unique by column name.
///
/// Order is preserved so the pipeline fills columns in a deterministic
/// sequence (a group-aggregate rule may read a column filled earlier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImputationPlan {
    entries: Vec<PlanEntry>,
}

impl ImputationPlan {
    /// Build a plan, rejecting duplicate column names.
    pub fn new(entries: Vec<PlanEntry>) -> Result<Self, ConfigError> {
        let plan = ImputationPlan { entries };
        plan.check_unique()?;
        Ok(plan)
    }

    /// Exact-name lookup.
    ///
    /// `None` means "no special handling": the caller picks its own default
    /// strategy for the column. Use `require_rule` to fail fast instead.
    pub fn rule_for(&self, column: &str) -> Option<&ImputationRule> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| &e.rule)
    }

    /// Lookup variant for callers that must not silently default.
    pub fn require_rule(&self, column: &str) -> Result<&ImputationRule, ConfigError> {
        self.rule_for(column)
            .ok_or_else(|| ConfigError::UnknownColumn(column.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in plan order.
    pub fn iter(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter()
    }

    /// Verify no column appears twice. Duplicates would make lookups
    /// order-dependent.
    pub(crate) fn check_unique(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.column.as_str()) {
                return Err(ConfigError::DuplicateColumn(entry.column.clone()));
            }
        }
        Ok(())
    }
}

/// One curated list of training rows to drop before fitting.
///
/// `feature` and `correlation` record why the rows were excluded: the sale
/// price of each row visibly breaks that feature's correlation with the
/// target. Keeping them as fields (not comments) lets run reports name the
/// reason next to the ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierList {
    /// Feature whose correlation with the target motivated the exclusion.
    pub feature: String,
    /// Pearson correlation between `feature` and the target.
    pub correlation: f64,
    /// 1-based training-set row ids to drop.
    pub row_ids: Vec<u32>,
}

/// The full curated outlier collection, one list per motivating feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSet {
    pub lists: Vec<OutlierList>,
}

impl OutlierSet {
    /// All row ids across every list, deduplicated and sorted.
    ///
    /// A row may appear in more than one list (it can break several
    /// correlations at once); dropping is idempotent, so the union is what
    /// the pipeline consumes.
    pub fn all_row_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .lists
            .iter()
            .flat_map(|list| list.row_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Check every row id lies in `[ROW_ID_MIN, ROW_ID_MAX]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for list in &self.lists {
            for &id in &list.row_ids {
                if !(ROW_ID_MIN..=ROW_ID_MAX).contains(&id) {
                    return Err(ConfigError::RowIdOutOfRange {
                        id,
                        feature: list.feature.clone(),
                        min: ROW_ID_MIN,
                        max: ROW_ID_MAX,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Optional exploratory diagnostics the pipeline may render.
///
/// These gate plots and prints only, never the fitted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    pub display_correlation_figure: bool,
    pub enable_outlier_discovery: bool,
    pub display_target_histogram: bool,
    pub print_skews: bool,
    pub display_engineered_features: bool,
}

/// Column-screening thresholds applied before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningThresholds {
    /// Drop a column whose missing-value rate exceeds this.
    pub max_missing_rate: f64,
    /// Ordinal-encode a categorical column only if at least this share of
    /// its category target means is monotonic.
    pub min_monotonic_proportion: f64,
    /// Drop a column once a single value covers at least this share of rows.
    pub min_dominant_proportion: f64,
}

/// Which pipeline stages run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageToggles {
    /// Write the submission file at the end of the run.
    pub submit: bool,
    /// Cross-validate the ridge model before training it.
    pub ridge_eval: bool,
    /// Train the ridge model.
    pub ridge_train: bool,
    /// Cross-validate the gradient-boosted model before training it.
    pub gbr_eval: bool,
    /// Train the gradient-boosted model.
    pub gbr_train: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(column: &str, rule: ImputationRule) -> PlanEntry {
        PlanEntry {
            column: column.to_string(),
            rule,
        }
    }

    #[test]
    fn plan_rejects_duplicate_columns() {
        let err = ImputationPlan::new(vec![
            entry("GarageArea", ImputationRule::number(0.0)),
            entry("GarageArea", ImputationRule::SampleObserved),
        ])
        .unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateColumn(c) if c == "GarageArea"));
    }

    #[test]
    fn plan_lookup_is_exact() {
        let plan = ImputationPlan::new(vec![entry("MasVnrArea", ImputationRule::number(0.0))]).unwrap();

        assert_eq!(plan.rule_for("MasVnrArea"), Some(&ImputationRule::number(0.0)));
        assert_eq!(plan.rule_for("masvnrarea"), None);
        assert_eq!(plan.rule_for("MasVnr"), None);
    }

    #[test]
    fn require_rule_fails_fast_on_absent_column() {
        let plan = ImputationPlan::new(Vec::new()).unwrap();
        let err = plan.require_rule("PoolQC").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn(c) if c == "PoolQC"));
    }

    #[test]
    fn outlier_union_dedups_and_sorts() {
        let set = OutlierSet {
            lists: vec![
                OutlierList {
                    feature: "A".to_string(),
                    correlation: 0.8,
                    row_ids: vec![523, 1298],
                },
                OutlierList {
                    feature: "B".to_string(),
                    correlation: 0.6,
                    row_ids: vec![581, 1298, 7],
                },
            ],
        };

        assert_eq!(set.all_row_ids(), vec![7, 523, 581, 1298]);
    }

    #[test]
    fn outlier_validate_accepts_the_id_bounds() {
        let set = OutlierSet {
            lists: vec![OutlierList {
                feature: "A".to_string(),
                correlation: 0.5,
                row_ids: vec![ROW_ID_MIN, ROW_ID_MAX],
            }],
        };

        assert!(set.validate().is_ok());
    }

    #[test]
    fn outlier_validate_rejects_out_of_range_ids() {
        for bad in [0u32, 1461] {
            let set = OutlierSet {
                lists: vec![OutlierList {
                    feature: "GrLivArea".to_string(),
                    correlation: 0.709,
                    row_ids: vec![523, bad],
                }],
            };

            let err = set.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::RowIdOutOfRange { id, .. } if id == bad),
                "id {bad} should be rejected"
            );
        }
    }
}
