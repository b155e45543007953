//! Crate error type.
//!
//! One enum covers every failure the registry and its helpers can produce,
//! so callers can match on the cases they care about: an unknown column is
//! usually recoverable, a failed log append usually is not.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no imputation rule for column '{0}'")]
    UnknownColumn(String),

    #[error("duplicate imputation rule for column '{0}'")]
    DuplicateColumn(String),

    #[error("outlier row id {id} for feature '{feature}' is outside [{min}, {max}]")]
    RowIdOutOfRange {
        id: u32,
        feature: String,
        min: u32,
        max: u32,
    },

    #[error("ensemble weights must sum to 1.0: ridge={ridge}, gbr={gbr}")]
    BadWeights { ridge: f64, gbr: f64 },

    #[error("ridge alpha candidate list is empty")]
    EmptyAlphas,

    #[error("cross-validation fold count must be >= 2, got {0}")]
    BadFoldCount(u32),

    #[error("{name} must be in (0, 1], got {value}")]
    BadFraction { name: &'static str, value: f64 },

    #[error("rule for column '{column}' expects a {expected} column, got {actual}")]
    RuleMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("group-aggregate rule for column '{0}' needs group keys")]
    MissingGroupKeys(String),

    #[error("group keys length {keys} does not match column length {values}")]
    GroupKeyLength { keys: usize, values: usize },

    #[error("column '{0}' has no observed values to impute from")]
    NoObservedValues(String),

    #[error("prediction lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_message_names_feature_and_bounds() {
        let err = ConfigError::RowIdOutOfRange {
            id: 2000,
            feature: "GrLivArea".to_string(),
            min: 1,
            max: 1460,
        };

        let msg = err.to_string();
        assert!(msg.contains("2000"), "missing id in: {msg}");
        assert!(msg.contains("GrLivArea"), "missing feature in: {msg}");
        assert!(msg.contains("1460"), "missing upper bound in: {msg}");
    }

    #[test]
    fn unknown_column_message_names_the_column() {
        let msg = ConfigError::UnknownColumn("PoolQC".to_string()).to_string();
        assert!(msg.contains("PoolQC"), "missing column in: {msg}");
    }
}
