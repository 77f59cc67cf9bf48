//! Free-text chart commands ("draw a bar chart of Sales by Region").
//!
//! Interpretation is a deterministic keyword and substring matcher:
//!
//! * the mark comes from the first entry of [`MARK_KEYWORDS`] with a keyword
//!   contained in the lowercased command, defaulting to a bar chart;
//! * a column is *mentioned* when its lowercased name occurs anywhere in the
//!   command, or when it is named by an explicit `channel=Column` assignment;
//! * mentioned columns are grouped by semantic type and roles are filled
//!   from the first column of the preferred type for each role.
//!
//! Explicit assignments (`x=Date`, `color="Sales Region"`) are applied after
//! the heuristic roles and replace them.

use std::sync::OnceLock;

use log::{debug, info};
use regex::Regex;

use crate::{
    config::AdvisorConfig,
    data::Record,
    error::{AdvisorError, Result},
    profile::{DatasetProfile, SemanticType, TypedColumns},
    spec::{Aggregate, Channel, ChannelDef, ChartSpec, Encoding, MarkKind, MarkOptions, build_spec},
};

/// Mark keywords, tested in order; the first hit wins.
pub const MARK_KEYWORDS: &[(&[&str], MarkKind)] = &[
    (&["line", "çizgi"], MarkKind::Line),
    (&["scatter", "dağılım", "nokta"], MarkKind::Circle),
    (&["area", "alan"], MarkKind::Area),
    (&["pie", "donut", "halka", "pasta"], MarkKind::Arc),
    (&[HISTOGRAM_KEYWORD], MarkKind::Bar),
];

pub const HISTOGRAM_KEYWORD: &str = "hist";

const ASSIGNMENT_PATTERN: &str =
    r#"(?i)\b(x|y|colou?r|size|theta)\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s,;]+))"#;

static ASSIGNMENT: OnceLock<Option<Regex>> = OnceLock::new();

/// Mark kind selected by the keyword table.
pub fn detect_mark(command: &str) -> MarkKind {
    let lowered = command.to_lowercase();
    MARK_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(MarkKind::Bar, |(_, mark)| *mark)
}

/// `channel=Column` pairs whose column exists in the profile (case-insensitive).
pub fn explicit_assignments<'a>(
    command: &str,
    profile: &'a DatasetProfile,
) -> Vec<(Channel, &'a str)> {
    let Some(regex) = ASSIGNMENT.get_or_init(|| Regex::new(ASSIGNMENT_PATTERN).ok()) else {
        return Vec::new();
    };
    regex
        .captures_iter(command)
        .filter_map(|caps| {
            let channel = caps.get(1)?.as_str().parse::<Channel>().ok()?;
            let wanted = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))?
                .as_str();
            let wanted = wanted.to_lowercase();
            let column = profile
                .column_names
                .iter()
                .find(|name| name.to_lowercase() == wanted)?;
            Some((channel, column.as_str()))
        })
        .collect()
}

/// Profile columns mentioned by the command, in column order.
pub fn mentioned_columns<'a>(command: &str, profile: &'a DatasetProfile) -> Vec<&'a str> {
    let lowered = command.to_lowercase();
    let explicit = explicit_assignments(command, profile);
    profile
        .column_names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            lowered.contains(&name.to_lowercase())
                || explicit.iter().any(|(_, column)| column == name)
        })
        .collect()
}

#[derive(Debug, Default)]
struct Roles<'a> {
    x: Option<&'a str>,
    y: Option<&'a str>,
    color: Option<&'a str>,
    size: Option<&'a str>,
    theta: Option<&'a str>,
}

impl<'a> Roles<'a> {
    fn assign(mark: MarkKind, mentioned: &[&'a str], typed: &TypedColumns<'a>) -> Self {
        let nth = |idx: usize| mentioned.get(idx).copied();
        match mark {
            MarkKind::Circle => Self {
                x: typed.quantitative(0).or_else(|| nth(0)),
                y: typed.quantitative(1).or_else(|| nth(1)),
                color: typed.nominal(0),
                size: typed.quantitative(2),
                ..Self::default()
            },
            MarkKind::Arc => Self {
                color: typed.nominal(0).or_else(|| nth(0)),
                theta: typed.quantitative(0).or_else(|| nth(1)),
                ..Self::default()
            },
            MarkKind::Line | MarkKind::Area => {
                let x = typed
                    .temporal(0)
                    .or_else(|| typed.nominal(0))
                    .or_else(|| nth(0));
                Self::with_category_axis(x, mentioned, typed)
            }
            MarkKind::Bar | MarkKind::Rect | MarkKind::Boxplot => {
                let x = typed
                    .nominal(0)
                    .or_else(|| typed.temporal(0))
                    .or_else(|| nth(0));
                Self::with_category_axis(x, mentioned, typed)
            }
        }
    }

    fn with_category_axis(
        x: Option<&'a str>,
        mentioned: &[&'a str],
        typed: &TypedColumns<'a>,
    ) -> Self {
        Self {
            x,
            y: typed.quantitative(0).or_else(|| mentioned.get(1).copied()),
            color: typed.nominal.iter().copied().find(|name| Some(*name) != x),
            ..Self::default()
        }
    }

    fn apply(&mut self, channel: Channel, column: &'a str) {
        match channel {
            Channel::X => self.x = Some(column),
            Channel::Y => self.y = Some(column),
            Channel::Color => self.color = Some(column),
            Channel::Size => self.size = Some(column),
            Channel::Theta => self.theta = Some(column),
            Channel::XOffset => {}
        }
    }
}

pub fn interpret_command(
    command: &str,
    profile: &DatasetProfile,
    records: &[Record],
) -> Result<ChartSpec> {
    interpret_command_with(command, profile, records, &AdvisorConfig::default())
}

pub fn interpret_command_with(
    command: &str,
    profile: &DatasetProfile,
    records: &[Record],
    config: &AdvisorConfig,
) -> Result<ChartSpec> {
    let mark = detect_mark(command);
    let mentioned = mentioned_columns(command, profile);
    if mentioned.is_empty() {
        debug!("No known column mentioned in '{command}'");
        return Err(AdvisorError::UnparseableCommand {
            command: command.to_string(),
        });
    }

    let typed = TypedColumns::partition(profile, mentioned.iter().copied());
    let mut roles = Roles::assign(mark, &mentioned, &typed);
    for (channel, column) in explicit_assignments(command, profile) {
        debug!("Explicit assignment {channel}={column}");
        roles.apply(channel, column);
    }

    let histogram = command.to_lowercase().contains(HISTOGRAM_KEYWORD);
    let (encoding, options) = encode(mark, &roles, profile, histogram, config);
    info!(
        "Interpreted command as {mark} chart over {} column(s) ({} channel(s))",
        mentioned.len(),
        encoding.len()
    );
    Ok(build_spec(mark, encoding, records, options, &config.style))
}

fn encode(
    mark: MarkKind,
    roles: &Roles<'_>,
    profile: &DatasetProfile,
    histogram: bool,
    config: &AdvisorConfig,
) -> (Encoding, MarkOptions) {
    let typed_def = |column: &str| match profile.semantic_type(column) {
        Some(semantic_type) => ChannelDef::field(column, semantic_type),
        None => ChannelDef::untyped(column),
    };

    if mark == MarkKind::Arc {
        let theta = roles.theta.map_or_else(ChannelDef::count, |column| {
            ChannelDef::untyped(column).aggregate(Aggregate::Sum)
        });
        let encoding = Encoding::new().with(Channel::Theta, theta).with_opt(
            Channel::Color,
            roles
                .color
                .map(|column| ChannelDef::field(column, SemanticType::Nominal)),
        );
        return (encoding, MarkOptions::donut(config.donut_inner_radius));
    }

    let y = roles.y.map(|column| {
        let def = typed_def(column);
        let summed = mark == MarkKind::Bar
            && profile.semantic_type(column) == Some(SemanticType::Quantitative);
        if summed { def.aggregate(Aggregate::Sum) } else { def }
    });
    let mut encoding = Encoding::new()
        .with_opt(Channel::X, roles.x.map(typed_def))
        .with_opt(Channel::Y, y)
        .with_opt(Channel::Color, roles.color.map(typed_def))
        .with_opt(
            Channel::Size,
            roles
                .size
                .map(|column| ChannelDef::field(column, SemanticType::Quantitative)),
        );

    if histogram && let Some(x) = roles.x {
        encoding.set(Channel::X, ChannelDef::untyped(x).binned());
        encoding.set(Channel::Y, ChannelDef::count());
    }
    (encoding, MarkOptions::default())
}
