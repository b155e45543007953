//! Single-column imputation rule execution.
//!
//! The registry declares *what* to do per column; this module is the
//! executor that does it to one column at a time. Sampling strategies draw
//! from a caller-supplied seeded `StdRng`, so a run with a fixed
//! `random_state` fills the same holes with the same values every time.

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{Aggregate, ImputationRule, ImputeValue};
use crate::error::ConfigError;

/// One column's values, holes as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of holes still to fill.
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ColumnData::Numeric(_) => "numeric",
            ColumnData::Text(_) => "text",
        }
    }
}

/// Apply one rule to one column in place; returns the number of holes filled.
///
/// `group_keys` carries the grouping column's value per row and is required
/// only by `GroupAggregate` rules. A group with no observed values falls back
/// to the whole-column aggregate; a column with no observed values at all
/// cannot feed the sampling or aggregate strategies and is an error.
pub fn apply_rule(
    column: &str,
    rule: &ImputationRule,
    data: &mut ColumnData,
    group_keys: Option<&[String]>,
    rng: &mut StdRng,
) -> Result<usize, ConfigError> {
    match rule {
        ImputationRule::Constant { value } => fill_constant(column, value, data),
        ImputationRule::SampleObserved => fill_sampled(column, data, rng),
        ImputationRule::GroupAggregate { aggregate, .. } => {
            let keys = group_keys.ok_or_else(|| ConfigError::MissingGroupKeys(column.to_string()))?;
            if keys.len() != data.len() {
                return Err(ConfigError::GroupKeyLength {
                    keys: keys.len(),
                    values: data.len(),
                });
            }
            fill_grouped(column, *aggregate, data, keys, rng)
        }
    }
}

fn fill_constant(
    column: &str,
    value: &ImputeValue,
    data: &mut ColumnData,
) -> Result<usize, ConfigError> {
    match (data, value) {
        (ColumnData::Numeric(values), ImputeValue::Number(fill)) => {
            Ok(fill_holes(values, || *fill))
        }
        (ColumnData::Text(values), ImputeValue::Text(fill)) => {
            Ok(fill_holes(values, || fill.clone()))
        }
        (data, ImputeValue::Number(_)) => Err(ConfigError::RuleMismatch {
            column: column.to_string(),
            expected: "numeric",
            actual: data.kind(),
        }),
        (data, ImputeValue::Text(_)) => Err(ConfigError::RuleMismatch {
            column: column.to_string(),
            expected: "text",
            actual: data.kind(),
        }),
    }
}

fn fill_sampled(column: &str, data: &mut ColumnData, rng: &mut StdRng) -> Result<usize, ConfigError> {
    match data {
        ColumnData::Numeric(values) => {
            let observed: Vec<f64> = values.iter().flatten().copied().collect();
            if observed.is_empty() {
                return Err(ConfigError::NoObservedValues(column.to_string()));
            }
            Ok(fill_holes(values, || {
                observed[rng.gen_range(0..observed.len())]
            }))
        }
        ColumnData::Text(values) => {
            let observed: Vec<String> = values.iter().flatten().cloned().collect();
            if observed.is_empty() {
                return Err(ConfigError::NoObservedValues(column.to_string()));
            }
            Ok(fill_holes(values, || {
                observed[rng.gen_range(0..observed.len())].clone()
            }))
        }
    }
}

fn fill_grouped(
    column: &str,
    aggregate: Aggregate,
    data: &mut ColumnData,
    keys: &[String],
    rng: &mut StdRng,
) -> Result<usize, ConfigError> {
    match (data, aggregate) {
        (ColumnData::Numeric(values), Aggregate::Median) => {
            let all: Vec<f64> = values.iter().flatten().copied().collect();
            if all.is_empty() {
                return Err(ConfigError::NoObservedValues(column.to_string()));
            }
            let fallback = median(all);

            let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
            for (key, value) in keys.iter().zip(values.iter()) {
                if let Some(v) = value {
                    groups.entry(key.as_str()).or_default().push(*v);
                }
            }
            let medians: HashMap<&str, f64> = groups
                .into_iter()
                .map(|(key, observed)| (key, median(observed)))
                .collect();

            let mut filled = 0;
            for (key, value) in keys.iter().zip(values.iter_mut()) {
                if value.is_none() {
                    *value = Some(medians.get(key.as_str()).copied().unwrap_or(fallback));
                    filled += 1;
                }
            }
            Ok(filled)
        }
        (data @ ColumnData::Text(_), Aggregate::Median) => Err(ConfigError::RuleMismatch {
            column: column.to_string(),
            expected: "numeric",
            actual: data.kind(),
        }),
        (ColumnData::Numeric(values), Aggregate::Random) => {
            let all: Vec<f64> = values.iter().flatten().copied().collect();
            if all.is_empty() {
                return Err(ConfigError::NoObservedValues(column.to_string()));
            }
            let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
            for (key, value) in keys.iter().zip(values.iter()) {
                if let Some(v) = value {
                    groups.entry(key.as_str()).or_default().push(*v);
                }
            }

            let mut filled = 0;
            for (key, value) in keys.iter().zip(values.iter_mut()) {
                if value.is_none() {
                    let pool = groups.get(key.as_str()).map_or(all.as_slice(), Vec::as_slice);
                    *value = Some(pool[rng.gen_range(0..pool.len())]);
                    filled += 1;
                }
            }
            Ok(filled)
        }
        (ColumnData::Text(values), Aggregate::Random) => {
            let all: Vec<String> = values.iter().flatten().cloned().collect();
            if all.is_empty() {
                return Err(ConfigError::NoObservedValues(column.to_string()));
            }
            let mut groups: HashMap<&str, Vec<String>> = HashMap::new();
            for (key, value) in keys.iter().zip(values.iter()) {
                if let Some(v) = value {
                    groups.entry(key.as_str()).or_default().push(v.clone());
                }
            }

            let mut filled = 0;
            for (key, value) in keys.iter().zip(values.iter_mut()) {
                if value.is_none() {
                    let pool = groups.get(key.as_str()).map_or(all.as_slice(), Vec::as_slice);
                    *value = Some(pool[rng.gen_range(0..pool.len())].clone());
                    filled += 1;
                }
            }
            Ok(filled)
        }
    }
}

fn fill_holes<T>(values: &mut [Option<T>], mut fill: impl FnMut() -> T) -> usize {
    let mut filled = 0;
    for value in values.iter_mut() {
        if value.is_none() {
            *value = Some(fill());
            filled += 1;
        }
    }
    filled
}

/// Median of the observed values; even counts take the mean of the two
/// middle values.
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
