//! Column typing and dataset profiling.
//!
//! A [`DatasetProfile`] is computed once per loaded dataset and never
//! patched afterwards; loading new records means building a new profile.
//!
//! ## Type inference
//!
//! Each column is classified from a bounded prefix of its non-missing
//! values (`sample_size`, default 100) in strict priority order:
//!
//! 1. **quantitative** when every sampled value is a finite number;
//! 2. **temporal** when every sampled value is a calendar date or date-time;
//! 3. **nominal** otherwise, and for columns with no values at all.
//!
//! The number of distinct values is reported as `unique_count` but plays no
//! part in the decision.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_SAMPLE_SIZE, DEFAULT_TOP_VALUES},
    data::{Record, Value},
    error::{AdvisorError, Result},
    stats::{self, Statistics},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Quantitative,
    Temporal,
    Nominal,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Quantitative => "quantitative",
            SemanticType::Temporal => "temporal",
            SemanticType::Nominal => "nominal",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub missing_ratio: f64,
    pub unique_count: usize,
    pub stats: Statistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_names: Vec<String>,
    pub columns: BTreeMap<String, ColumnProfile>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.get(name)
    }

    pub fn semantic_type(&self, name: &str) -> Option<SemanticType> {
        self.column(name).map(|column| column.semantic_type)
    }

    /// Columns of one type, in column order.
    pub fn columns_of(&self, semantic_type: SemanticType) -> Vec<&str> {
        self.column_names
            .iter()
            .filter(|name| self.semantic_type(name) == Some(semantic_type))
            .map(String::as_str)
            .collect()
    }

    /// Column profiles in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnProfile)> {
        self.column_names
            .iter()
            .filter_map(|name| self.columns.get(name).map(|col| (name.as_str(), col)))
    }
}

/// Column names grouped by semantic type, each group in column order.
///
/// Index 0 of a group is the "first available" column of that type, which is
/// the only candidate the suggestion rules, compatibility checks and command
/// roles ever consider for a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedColumns<'a> {
    pub quantitative: Vec<&'a str>,
    pub temporal: Vec<&'a str>,
    pub nominal: Vec<&'a str>,
}

impl<'a> TypedColumns<'a> {
    pub fn from_profile(profile: &'a DatasetProfile) -> Self {
        Self::partition(profile, profile.column_names.iter().map(String::as_str))
    }

    /// Groups `names` by their type in `profile`; unknown names are skipped.
    pub fn partition<I>(profile: &DatasetProfile, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut grouped = Self::default();
        for name in names {
            match profile.semantic_type(name) {
                Some(SemanticType::Quantitative) => grouped.quantitative.push(name),
                Some(SemanticType::Temporal) => grouped.temporal.push(name),
                Some(SemanticType::Nominal) => grouped.nominal.push(name),
                None => {}
            }
        }
        grouped
    }

    /// True when at least the given number of columns of each type exist.
    pub fn has(&self, quantitative: usize, temporal: usize, nominal: usize) -> bool {
        self.quantitative.len() >= quantitative
            && self.temporal.len() >= temporal
            && self.nominal.len() >= nominal
    }

    pub fn quantitative(&self, idx: usize) -> Option<&'a str> {
        self.quantitative.get(idx).copied()
    }

    pub fn temporal(&self, idx: usize) -> Option<&'a str> {
        self.temporal.get(idx).copied()
    }

    pub fn nominal(&self, idx: usize) -> Option<&'a str> {
        self.nominal.get(idx).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileOptions {
    pub sample_size: usize,
    pub top_values: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            top_values: DEFAULT_TOP_VALUES,
        }
    }
}

/// Classifies the non-missing values of one column.
pub fn infer_semantic_type(values: &[&Value], sample_size: usize) -> SemanticType {
    if values.is_empty() {
        return SemanticType::Nominal;
    }
    let sample = &values[..values.len().min(sample_size.max(1))];
    if sample.iter().all(|value| value.as_number().is_some()) {
        SemanticType::Quantitative
    } else if sample.iter().all(|value| value.as_temporal().is_some()) {
        SemanticType::Temporal
    } else {
        SemanticType::Nominal
    }
}

pub fn profile_records(records: &[Record]) -> Result<DatasetProfile> {
    profile_records_with(records, &ProfileOptions::default())
}

pub fn profile_records_with(
    records: &[Record],
    options: &ProfileOptions,
) -> Result<DatasetProfile> {
    let first = records.first().ok_or(AdvisorError::EmptyDataset)?;
    let row_count = records.len();
    let column_names = first.keys().map(str::to_string).collect::<Vec<_>>();

    let mut columns = BTreeMap::new();
    for name in &column_names {
        let present = records
            .iter()
            .filter_map(|record| record.get(name))
            .filter(|value| !value.is_missing())
            .collect::<Vec<_>>();
        let column = profile_column(&present, row_count, options);
        debug!(
            "Column '{name}' typed {} ({} of {row_count} present, {} distinct)",
            column.semantic_type,
            present.len(),
            column.unique_count
        );
        columns.insert(name.clone(), column);
    }

    Ok(DatasetProfile {
        row_count,
        column_names,
        columns,
    })
}

fn profile_column(
    present: &[&Value],
    row_count: usize,
    options: &ProfileOptions,
) -> ColumnProfile {
    let missing = row_count - present.len();
    let unique_count = present
        .iter()
        .map(|value| value.as_display())
        .collect::<HashSet<_>>()
        .len();
    let semantic_type = infer_semantic_type(present, options.sample_size);
    let categorical = || stats::categorical_summary(present.iter().copied(), options.top_values);
    let stats = match semantic_type {
        SemanticType::Quantitative => stats::numeric_summary(present.iter().copied())
            .map_or_else(categorical, Statistics::Numeric),
        SemanticType::Temporal | SemanticType::Nominal => categorical(),
    };
    ColumnProfile {
        semantic_type,
        missing_ratio: missing as f64 / row_count as f64,
        unique_count,
        stats,
    }
}
