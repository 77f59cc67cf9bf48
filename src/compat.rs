//! Structural compatibility between a chart category and a dataset profile.
//!
//! The category usually comes from an external classifier (an uploaded
//! chart image). Each category has a fixed column-type prerequisite; when it
//! holds, the spec is built from the first available column of each type,
//! otherwise the caller gets a category-specific reason. There is no partial
//! compatibility.

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AdvisorConfig,
    data::Record,
    error::{AdvisorError, Result},
    profile::{DatasetProfile, SemanticType, TypedColumns},
    spec::{Aggregate, Channel, ChannelDef, ChartSpec, Encoding, MarkKind, MarkOptions, build_spec},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartCategory {
    Line,
    Bar,
    Circle,
    Arc,
    Area,
    Rect,
}

impl ChartCategory {
    pub const ALL: [ChartCategory; 6] = [
        ChartCategory::Line,
        ChartCategory::Bar,
        ChartCategory::Circle,
        ChartCategory::Arc,
        ChartCategory::Area,
        ChartCategory::Rect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartCategory::Line => "line",
            ChartCategory::Bar => "bar",
            ChartCategory::Circle => "circle",
            ChartCategory::Arc => "arc",
            ChartCategory::Area => "area",
            ChartCategory::Rect => "rect",
        }
    }

    pub fn mark(&self) -> MarkKind {
        match self {
            ChartCategory::Line => MarkKind::Line,
            ChartCategory::Bar => MarkKind::Bar,
            ChartCategory::Circle => MarkKind::Circle,
            ChartCategory::Arc => MarkKind::Arc,
            ChartCategory::Area => MarkKind::Area,
            ChartCategory::Rect => MarkKind::Rect,
        }
    }

    /// Reason reported when the profile cannot support this category.
    pub fn requirement(&self) -> &'static str {
        match self {
            ChartCategory::Line => "Line chart requires at least one Date and one Numeric column.",
            ChartCategory::Bar => {
                "Bar chart requires at least one Categorical and one Numeric column."
            }
            ChartCategory::Circle => "Scatter plot requires at least two Numeric columns.",
            ChartCategory::Arc => {
                "Pie/Donut chart requires at least one Categorical and one Numeric column."
            }
            ChartCategory::Area => "Area chart requires at least one Date and one Numeric column.",
            ChartCategory::Rect => {
                "Heatmap requires at least two Categorical and one Numeric column."
            }
        }
    }

    /// Guesses a category from an image file name such as `sales_line.png`.
    ///
    /// Returns `None` when no hint matches; callers decide what to do then.
    pub fn from_file_hint(name: &str) -> Option<Self> {
        const HINTS: &[(&[&str], ChartCategory)] = &[
            (&["line"], ChartCategory::Line),
            (&["bar"], ChartCategory::Bar),
            (&["scatter", "point"], ChartCategory::Circle),
            (&["pie", "donut"], ChartCategory::Arc),
            (&["area"], ChartCategory::Area),
            (&["heat"], ChartCategory::Rect),
        ];
        let lowered = name.to_lowercase();
        HINTS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|(_, category)| *category)
    }
}

impl fmt::Display for ChartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartCategory {
    type Err = AdvisorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartCategory::Line),
            "bar" => Ok(ChartCategory::Bar),
            "circle" | "scatter" | "point" => Ok(ChartCategory::Circle),
            "arc" | "pie" | "donut" => Ok(ChartCategory::Arc),
            "area" => Ok(ChartCategory::Area),
            "rect" | "heatmap" => Ok(ChartCategory::Rect),
            _ => Err(AdvisorError::UnrecognizedCategory {
                label: value.to_string(),
            }),
        }
    }
}

/// Serializable `{compatible, reason, spec}` view of a check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityReport {
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<ChartSpec>,
}

impl From<Result<ChartSpec>> for CompatibilityReport {
    fn from(result: Result<ChartSpec>) -> Self {
        match result {
            Ok(spec) => Self {
                compatible: true,
                reason: None,
                spec: Some(spec),
            },
            Err(err) => Self {
                compatible: false,
                reason: Some(err.user_message()),
                spec: None,
            },
        }
    }
}

pub fn check_compatibility(
    label: &str,
    profile: &DatasetProfile,
    records: &[Record],
) -> Result<ChartSpec> {
    check_compatibility_with(label, profile, records, &AdvisorConfig::default())
}

pub fn check_compatibility_with(
    label: &str,
    profile: &DatasetProfile,
    records: &[Record],
    config: &AdvisorConfig,
) -> Result<ChartSpec> {
    let category = label.parse::<ChartCategory>()?;
    check_category(category, profile, records, config)
}

pub fn check_category(
    category: ChartCategory,
    profile: &DatasetProfile,
    records: &[Record],
    config: &AdvisorConfig,
) -> Result<ChartSpec> {
    let cols = TypedColumns::from_profile(profile);
    let Some((encoding, options)) = category_encoding(category, &cols, config) else {
        debug!("Category '{category}' incompatible with profile");
        return Err(AdvisorError::IncompatibleStructure {
            category,
            reason: category.requirement().to_string(),
        });
    };
    debug!("Category '{category}' compatible with profile");
    Ok(build_spec(
        category.mark(),
        encoding,
        records,
        options,
        &config.style,
    ))
}

fn category_encoding(
    category: ChartCategory,
    cols: &TypedColumns<'_>,
    config: &AdvisorConfig,
) -> Option<(Encoding, MarkOptions)> {
    let nominal_color = cols
        .nominal(0)
        .map(|n| ChannelDef::field(n, SemanticType::Nominal));
    let encoding = match category {
        ChartCategory::Line => Encoding::new()
            .with(Channel::X, ChannelDef::field(cols.temporal(0)?, SemanticType::Temporal))
            .with(
                Channel::Y,
                ChannelDef::field(cols.quantitative(0)?, SemanticType::Quantitative),
            )
            .with_opt(Channel::Color, nominal_color),
        ChartCategory::Bar => {
            let n0 = cols.nominal(0)?;
            Encoding::new()
                .with(Channel::X, ChannelDef::field(n0, SemanticType::Nominal).sort("-y"))
                .with(
                    Channel::Y,
                    ChannelDef::field(cols.quantitative(0)?, SemanticType::Quantitative)
                        .aggregate(Aggregate::Sum),
                )
                .with(Channel::Color, ChannelDef::field(n0, SemanticType::Nominal))
        }
        ChartCategory::Circle => Encoding::new()
            .with(
                Channel::X,
                ChannelDef::field(cols.quantitative(0)?, SemanticType::Quantitative),
            )
            .with(
                Channel::Y,
                ChannelDef::field(cols.quantitative(1)?, SemanticType::Quantitative),
            )
            .with_opt(Channel::Color, nominal_color)
            .with_opt(
                Channel::Size,
                cols.quantitative(2)
                    .map(|q| ChannelDef::field(q, SemanticType::Quantitative)),
            ),
        ChartCategory::Arc => {
            let q0 = cols.quantitative(0)?;
            let encoding = Encoding::new()
                .with(Channel::Theta, ChannelDef::untyped(q0).aggregate(Aggregate::Sum))
                .with(Channel::Color, nominal_color?);
            return Some((encoding, MarkOptions::donut(config.donut_inner_radius)));
        }
        ChartCategory::Area => Encoding::new()
            .with(Channel::X, ChannelDef::field(cols.temporal(0)?, SemanticType::Temporal))
            .with(
                Channel::Y,
                ChannelDef::field(cols.quantitative(0)?, SemanticType::Quantitative)
                    .stack("center"),
            )
            .with_opt(Channel::Color, nominal_color),
        ChartCategory::Rect => Encoding::new()
            .with(Channel::X, ChannelDef::field(cols.nominal(0)?, SemanticType::Nominal))
            .with(Channel::Y, ChannelDef::field(cols.nominal(1)?, SemanticType::Nominal))
            .with(
                Channel::Color,
                ChannelDef::untyped(cols.quantitative(0)?).aggregate(Aggregate::Sum),
            ),
    };
    Some((encoding, MarkOptions::default()))
}
