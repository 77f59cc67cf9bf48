//! Ranked chart suggestions from a fixed rule catalogue.
//!
//! [`CATALOGUE`] is evaluated top to bottom. A rule fires when the profile has
//! enough columns of the types it needs, and always binds the first
//! available column of each type to its roles. Rank is the position in the
//! emitted list, nothing more: there is no scoring.
//!
//! When fewer than `max_suggestions` rules fire and the data has both a
//! nominal and a quantitative column, the list is padded with count bars that
//! cycle through the nominal columns.

use std::collections::BTreeMap;

use heck::ToTitleCase;
use log::debug;
use serde::Serialize;

use crate::{
    compat::ChartCategory,
    config::AdvisorConfig,
    data::Record,
    profile::{DatasetProfile, SemanticType, TypedColumns},
    spec::{
        Aggregate, Channel, ChannelDef, ChartSpec, Encoding, FieldType, MarkKind, MarkOptions,
        build_spec,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub rank: usize,
    pub chart_type: String,
    pub reason: String,
    pub mapping: BTreeMap<Channel, String>,
    pub spec: ChartSpec,
}

impl Suggestion {
    /// Single suggestion for a chart category detected elsewhere (for
    /// example from an uploaded image) that passed the compatibility check.
    pub fn detected(category: ChartCategory, spec: ChartSpec) -> Self {
        let mapping = spec
            .encoding
            .channels()
            .filter_map(|(channel, def)| def.field_name().map(|f| (channel, f.to_string())))
            .collect();
        Self {
            rank: 1,
            chart_type: format!("{} Chart", category.as_str().to_title_case()),
            reason: format!(
                "The chart type detected in the uploaded image ({category}) is compatible with your data."
            ),
            mapping,
            spec,
        }
    }
}

/// Mark, encoding and wording of one fired rule, before it is ranked.
struct Draft {
    mark: MarkKind,
    encoding: Encoding,
    options: MarkOptions,
    reason: String,
    mapping: Vec<(Channel, String)>,
}

pub struct Rule {
    pub chart_type: &'static str,
    applies: fn(&TypedColumns<'_>) -> bool,
    draft: fn(&TypedColumns<'_>, &AdvisorConfig) -> Option<Draft>,
}

pub const CATALOGUE: &[Rule] = &[
    Rule {
        chart_type: "Line Chart",
        applies: |cols| cols.has(1, 1, 0),
        draft: trend_over_time,
    },
    Rule {
        chart_type: "Bar Chart",
        applies: |cols| cols.has(1, 0, 1),
        draft: category_comparison,
    },
    Rule {
        chart_type: "Scatter Plot",
        applies: |cols| cols.has(2, 0, 0),
        draft: numeric_relationship,
    },
    Rule {
        chart_type: "Histogram",
        applies: |cols| cols.has(1, 0, 0),
        draft: numeric_distribution,
    },
    Rule {
        chart_type: "Box Plot",
        applies: |cols| cols.has(1, 0, 1),
        draft: category_distribution,
    },
    Rule {
        chart_type: "Heatmap",
        applies: |cols| cols.has(1, 0, 2),
        draft: category_intensity,
    },
    Rule {
        chart_type: "Heatmap",
        applies: |cols| !cols.has(1, 0, 2) && cols.has(1, 1, 1),
        draft: temporal_intensity,
    },
    Rule {
        chart_type: "Donut Chart",
        applies: |cols| cols.has(1, 0, 1),
        draft: proportion_breakdown,
    },
    Rule {
        chart_type: "Area Chart",
        applies: |cols| cols.has(1, 1, 0),
        draft: cumulative_trend,
    },
    Rule {
        chart_type: "Grouped Bar",
        applies: |cols| cols.has(1, 0, 2),
        draft: grouped_comparison,
    },
    Rule {
        chart_type: "Bubble Chart",
        applies: |cols| cols.has(3, 0, 0),
        draft: three_numeric_relationship,
    },
];

const FILLER_CHART_TYPE: &str = "Count Bar";

pub fn suggest_charts(profile: &DatasetProfile, records: &[Record]) -> Vec<Suggestion> {
    suggest_charts_with(profile, records, &AdvisorConfig::default())
}

pub fn suggest_charts_with(
    profile: &DatasetProfile,
    records: &[Record],
    config: &AdvisorConfig,
) -> Vec<Suggestion> {
    let cols = TypedColumns::from_profile(profile);
    let mut fired: Vec<(&'static str, Draft)> = Vec::new();

    for rule in CATALOGUE {
        if !(rule.applies)(&cols) {
            debug!("Rule '{}' skipped: prerequisites unmet", rule.chart_type);
            continue;
        }
        if let Some(draft) = (rule.draft)(&cols, config) {
            debug!("Rule '{}' fired", rule.chart_type);
            fired.push((rule.chart_type, draft));
        }
    }

    while fired.len() < config.max_suggestions && cols.has(1, 0, 1) {
        let category = cols.nominal[fired.len() % cols.nominal.len()];
        fired.push((FILLER_CHART_TYPE, count_bar(category)));
    }
    fired.truncate(config.max_suggestions);

    fired
        .into_iter()
        .enumerate()
        .map(|(idx, (chart_type, draft))| Suggestion {
            rank: idx + 1,
            chart_type: chart_type.to_string(),
            reason: draft.reason,
            mapping: draft.mapping.into_iter().collect(),
            spec: build_spec(
                draft.mark,
                draft.encoding,
                records,
                draft.options,
                &config.style,
            ),
        })
        .collect()
}

fn typed(name: &str, semantic_type: SemanticType) -> ChannelDef {
    ChannelDef::field(name, semantic_type)
}

fn optional_nominal(cols: &TypedColumns<'_>) -> Option<ChannelDef> {
    cols.nominal(0).map(|n| typed(n, SemanticType::Nominal))
}

fn with_optional(
    mut mapping: Vec<(Channel, String)>,
    channel: Channel,
    name: Option<&str>,
) -> Vec<(Channel, String)> {
    if let Some(name) = name {
        mapping.push((channel, name.to_string()));
    }
    mapping
}

fn trend_over_time(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (t0, q0) = (cols.temporal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Line,
        encoding: Encoding::new()
            .with(Channel::X, typed(t0, SemanticType::Temporal))
            .with(Channel::Y, typed(q0, SemanticType::Quantitative))
            .with_opt(Channel::Color, optional_nominal(cols)),
        options: MarkOptions::default(),
        reason: format!("Shows trends of {q0} over time ({t0})."),
        mapping: with_optional(
            vec![(Channel::X, t0.to_string()), (Channel::Y, q0.to_string())],
            Channel::Color,
            cols.nominal(0),
        ),
    })
}

fn category_comparison(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (n0, q0) = (cols.nominal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Bar,
        encoding: Encoding::new()
            .with(Channel::X, typed(n0, SemanticType::Nominal).sort("-y"))
            .with(
                Channel::Y,
                typed(q0, SemanticType::Quantitative).aggregate(Aggregate::Sum),
            )
            .with(Channel::Color, typed(n0, SemanticType::Nominal)),
        options: MarkOptions::default(),
        reason: format!("Compares {q0} across different {n0} categories."),
        mapping: vec![(Channel::X, n0.to_string()), (Channel::Y, q0.to_string())],
    })
}

fn numeric_relationship(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (q0, q1) = (cols.quantitative(0)?, cols.quantitative(1)?);
    Some(Draft {
        mark: MarkKind::Circle,
        encoding: Encoding::new()
            .with(Channel::X, typed(q0, SemanticType::Quantitative))
            .with(Channel::Y, typed(q1, SemanticType::Quantitative))
            .with_opt(Channel::Color, optional_nominal(cols))
            .with_opt(
                Channel::Size,
                cols.quantitative(2)
                    .map(|q2| typed(q2, SemanticType::Quantitative)),
            ),
        options: MarkOptions::default(),
        reason: format!("Shows relationship between {q0} and {q1}."),
        mapping: with_optional(
            vec![(Channel::X, q0.to_string()), (Channel::Y, q1.to_string())],
            Channel::Color,
            cols.nominal(0),
        ),
    })
}

fn numeric_distribution(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let q0 = cols.quantitative(0)?;
    Some(Draft {
        mark: MarkKind::Bar,
        encoding: Encoding::new()
            .with(Channel::X, ChannelDef::untyped(q0).binned())
            .with(Channel::Y, ChannelDef::count()),
        options: MarkOptions::default(),
        reason: format!("Shows distribution of {q0}."),
        mapping: vec![(Channel::X, q0.to_string())],
    })
}

fn category_distribution(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (n0, q0) = (cols.nominal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Boxplot,
        encoding: Encoding::new()
            .with(Channel::X, typed(n0, SemanticType::Nominal))
            .with(Channel::Y, typed(q0, SemanticType::Quantitative)),
        options: MarkOptions::default(),
        reason: format!("Shows distribution and outliers of {q0} for each {n0}."),
        mapping: vec![(Channel::X, n0.to_string()), (Channel::Y, q0.to_string())],
    })
}

fn category_intensity(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (n0, n1, q0) = (cols.nominal(0)?, cols.nominal(1)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Rect,
        encoding: Encoding::new()
            .with(Channel::X, typed(n0, SemanticType::Nominal))
            .with(Channel::Y, typed(n1, SemanticType::Nominal))
            .with(Channel::Color, ChannelDef::untyped(q0).aggregate(Aggregate::Sum)),
        options: MarkOptions::default(),
        reason: format!("Shows intensity of {q0} between {n0} and {n1}."),
        mapping: vec![
            (Channel::X, n0.to_string()),
            (Channel::Y, n1.to_string()),
            (Channel::Color, q0.to_string()),
        ],
    })
}

fn temporal_intensity(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (t0, n0, q0) = (cols.temporal(0)?, cols.nominal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Rect,
        encoding: Encoding::new()
            .with(
                Channel::X,
                ChannelDef::field(t0, FieldType::Ordinal).time_unit("month"),
            )
            .with(Channel::Y, typed(n0, SemanticType::Nominal))
            .with(Channel::Color, ChannelDef::untyped(q0).aggregate(Aggregate::Sum)),
        options: MarkOptions::default(),
        reason: format!("Shows intensity of {q0} over time by {n0}."),
        mapping: vec![
            (Channel::X, t0.to_string()),
            (Channel::Y, n0.to_string()),
            (Channel::Color, q0.to_string()),
        ],
    })
}

fn proportion_breakdown(cols: &TypedColumns<'_>, config: &AdvisorConfig) -> Option<Draft> {
    let (n0, q0) = (cols.nominal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Arc,
        encoding: Encoding::new()
            .with(Channel::Theta, ChannelDef::untyped(q0).aggregate(Aggregate::Sum))
            .with(Channel::Color, typed(n0, SemanticType::Nominal)),
        options: MarkOptions::donut(config.donut_inner_radius),
        reason: format!("Shows proportion of {q0} by {n0}."),
        mapping: vec![
            (Channel::Color, n0.to_string()),
            (Channel::Theta, q0.to_string()),
        ],
    })
}

fn cumulative_trend(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (t0, q0) = (cols.temporal(0)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Area,
        encoding: Encoding::new()
            .with(Channel::X, typed(t0, SemanticType::Temporal))
            .with(
                Channel::Y,
                typed(q0, SemanticType::Quantitative).stack("center"),
            )
            .with_opt(Channel::Color, optional_nominal(cols)),
        options: MarkOptions::default(),
        reason: format!("Shows cumulative trend of {q0} over time."),
        mapping: with_optional(
            vec![(Channel::X, t0.to_string()), (Channel::Y, q0.to_string())],
            Channel::Color,
            cols.nominal(0),
        ),
    })
}

fn grouped_comparison(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (n0, n1, q0) = (cols.nominal(0)?, cols.nominal(1)?, cols.quantitative(0)?);
    Some(Draft {
        mark: MarkKind::Bar,
        encoding: Encoding::new()
            .with(Channel::X, typed(n0, SemanticType::Nominal))
            .with(
                Channel::Y,
                typed(q0, SemanticType::Quantitative).aggregate(Aggregate::Sum),
            )
            .with(Channel::XOffset, ChannelDef::untyped(n1))
            .with(Channel::Color, typed(n1, SemanticType::Nominal)),
        options: MarkOptions::default(),
        reason: format!("Compares {q0} by {n0} grouped by {n1}."),
        mapping: vec![
            (Channel::X, n0.to_string()),
            (Channel::Y, q0.to_string()),
            (Channel::Color, n1.to_string()),
        ],
    })
}

fn three_numeric_relationship(cols: &TypedColumns<'_>, _: &AdvisorConfig) -> Option<Draft> {
    let (q0, q1, q2) = (
        cols.quantitative(0)?,
        cols.quantitative(1)?,
        cols.quantitative(2)?,
    );
    Some(Draft {
        mark: MarkKind::Circle,
        encoding: Encoding::new()
            .with(Channel::X, typed(q0, SemanticType::Quantitative))
            .with(Channel::Y, typed(q1, SemanticType::Quantitative))
            .with(Channel::Size, typed(q2, SemanticType::Quantitative))
            .with_opt(Channel::Color, optional_nominal(cols)),
        options: MarkOptions::default(),
        reason: format!("Multi-variable comparison: {q0} vs {q1} sized by {q2}."),
        mapping: with_optional(
            vec![
                (Channel::X, q0.to_string()),
                (Channel::Y, q1.to_string()),
                (Channel::Size, q2.to_string()),
            ],
            Channel::Color,
            cols.nominal(0),
        ),
    })
}

fn count_bar(category: &str) -> Draft {
    Draft {
        mark: MarkKind::Bar,
        encoding: Encoding::new()
            .with(Channel::X, typed(category, SemanticType::Nominal).sort("-y"))
            .with(Channel::Y, ChannelDef::count()),
        options: MarkOptions::default(),
        reason: format!("Frequency of {category}."),
        mapping: vec![
            (Channel::X, category.to_string()),
            (Channel::Y, "Count".to_string()),
        ],
    }
}
