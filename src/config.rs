//! Tunables for profiling, suggestion and spec generation.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! reproduces the stock behaviour. A partial file overrides only the keys it
//! names:
//!
//! ```yaml
//! sample_size: 250
//! max_suggestions: 6
//! style:
//!   height: 320
//!   grid_color: "#e5e7eb"
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{profile::ProfileOptions, spec::SpecStyle};

pub const DEFAULT_SAMPLE_SIZE: usize = 100;
pub const DEFAULT_TOP_VALUES: usize = 3;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
pub const DEFAULT_DONUT_INNER_RADIUS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Non-missing values inspected per column when inferring its type.
    pub sample_size: usize,
    /// Frequent values kept for temporal and nominal columns.
    pub top_values: usize,
    pub max_suggestions: usize,
    pub donut_inner_radius: u32,
    pub style: SpecStyle,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            top_values: DEFAULT_TOP_VALUES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            donut_inner_radius: DEFAULT_DONUT_INNER_RADIUS,
            style: SpecStyle::default(),
        }
    }
}

impl AdvisorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config = Self::from_yaml_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: AdvisorConfig = if raw.trim().is_empty() {
            AdvisorConfig::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.sample_size > 0, "sample_size must be at least 1");
        ensure!(self.top_values > 0, "top_values must be at least 1");
        ensure!(
            (1..=DEFAULT_MAX_SUGGESTIONS).contains(&self.max_suggestions),
            "max_suggestions must be between 1 and {DEFAULT_MAX_SUGGESTIONS}"
        );
        Ok(())
    }

    pub fn profile_options(&self) -> ProfileOptions {
        ProfileOptions {
            sample_size: self.sample_size,
            top_values: self.top_values,
        }
    }
}
