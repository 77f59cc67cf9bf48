//! Declarative chart specification (Vega-Lite v5) construction.
//!
//! [`build_spec`] is the single funnel every other component goes through:
//! suggestions, compatibility checks and command interpretation all validate
//! their own encodings first and then hand a mark, an [`Encoding`] and the
//! records to this module. Nothing here consults the profile.
//!
//! The produced [`ChartSpec`] embeds the records by value, enables tooltips,
//! binds a pan/zoom interval selection to the scales and carries the style
//! block from [`SpecStyle`], so every generated chart looks the same.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{data::Record, profile::SemanticType};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Bar,
    Line,
    Area,
    Circle,
    Arc,
    Rect,
    Boxplot,
}

impl MarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkKind::Bar => "bar",
            MarkKind::Line => "line",
            MarkKind::Area => "area",
            MarkKind::Circle => "circle",
            MarkKind::Arc => "arc",
            MarkKind::Rect => "rect",
            MarkKind::Boxplot => "boxplot",
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(MarkKind::Bar),
            "line" => Ok(MarkKind::Line),
            "area" => Ok(MarkKind::Area),
            "circle" | "point" => Ok(MarkKind::Circle),
            "arc" => Ok(MarkKind::Arc),
            "rect" => Ok(MarkKind::Rect),
            "boxplot" => Ok(MarkKind::Boxplot),
            other => Err(format!("Unknown mark kind '{other}'")),
        }
    }
}

/// Encoding channels, in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    X,
    Y,
    Color,
    Size,
    Theta,
    XOffset,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Color => "color",
            Channel::Size => "size",
            Channel::Theta => "theta",
            Channel::XOffset => "xOffset",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Channel::X),
            "y" => Ok(Channel::Y),
            "color" | "colour" => Ok(Channel::Color),
            "size" => Ok(Channel::Size),
            "theta" => Ok(Channel::Theta),
            "xoffset" => Ok(Channel::XOffset),
            other => Err(format!("Unknown channel '{other}'")),
        }
    }
}

/// Field type as understood by the renderer; a superset of [`SemanticType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Temporal,
    Nominal,
    Ordinal,
}

impl From<SemanticType> for FieldType {
    fn from(value: SemanticType) -> Self {
        match value {
            SemanticType::Quantitative => FieldType::Quantitative,
            SemanticType::Temporal => FieldType::Temporal,
            SemanticType::Nominal => FieldType::Nominal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    Count,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
}

impl ChannelDef {
    pub fn field(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            field: Some(name.into()),
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// A field reference that leaves the type to the renderer.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            ..Self::default()
        }
    }

    /// Record count, with no field.
    pub fn count() -> Self {
        Self {
            aggregate: Some(Aggregate::Count),
            ..Self::default()
        }
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn binned(mut self) -> Self {
        self.bin = Some(true);
        self
    }

    pub fn sort(mut self, order: impl Into<String>) -> Self {
        self.sort = Some(order.into());
        self
    }

    pub fn stack(mut self, offset: impl Into<String>) -> Self {
        self.stack = Some(offset.into());
        self
    }

    pub fn time_unit(mut self, unit: impl Into<String>) -> Self {
        self.time_unit = Some(unit.into());
        self
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encoding {
    channels: BTreeMap<Channel, ChannelDef>,
}

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: Channel, def: ChannelDef) -> Self {
        self.channels.insert(channel, def);
        self
    }

    /// Like [`Encoding::with`], skipping absent optional channels.
    pub fn with_opt(self, channel: Channel, def: Option<ChannelDef>) -> Self {
        match def {
            Some(def) => self.with(channel, def),
            None => self,
        }
    }

    pub fn set(&mut self, channel: Channel, def: ChannelDef) {
        self.channels.insert(channel, def);
    }

    pub fn get(&self, channel: Channel) -> Option<&ChannelDef> {
        self.channels.get(&channel)
    }

    pub fn field(&self, channel: Channel) -> Option<&str> {
        self.get(channel).and_then(ChannelDef::field_name)
    }

    pub fn channels(&self) -> impl Iterator<Item = (Channel, &ChannelDef)> {
        self.channels.iter().map(|(channel, def)| (*channel, def))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Mark-specific options merged into the mark descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkOptions {
    pub inner_radius: Option<u32>,
}

impl MarkOptions {
    pub fn donut(inner_radius: u32) -> Self {
        Self {
            inner_radius: Some(inner_radius),
        }
    }
}

/// Visual defaults shared by every generated spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecStyle {
    pub schema: String,
    pub height: u32,
    pub view_stroke: String,
    pub tick_color: String,
    pub grid_color: String,
    pub label_color: String,
    pub title_color: String,
    pub title_font_weight: String,
}

impl Default for SpecStyle {
    fn default() -> Self {
        Self {
            schema: VEGA_LITE_SCHEMA.to_string(),
            height: 400,
            view_stroke: "transparent".to_string(),
            tick_color: "lightgray".to_string(),
            grid_color: "#f3f4f6".to_string(),
            label_color: "#4b5563".to_string(),
            title_color: "#374151".to_string(),
            title_font_weight: "bold".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub width: String,
    pub height: u32,
    pub autosize: Autosize,
    pub data: InlineData,
    pub mark: MarkDef,
    pub encoding: Encoding,
    pub params: Vec<SelectionParam>,
    pub config: StyleConfig,
}

impl ChartSpec {
    pub fn mark_kind(&self) -> MarkKind {
        self.mark.kind
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Autosize {
    #[serde(rename = "type")]
    pub kind: String,
    pub contains: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    pub values: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDef {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    pub tooltip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionParam {
    pub name: String,
    pub select: String,
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleConfig {
    pub view: ViewStyle,
    pub axis: AxisStyle,
    pub legend: LegendStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewStyle {
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    pub domain: bool,
    pub tick_color: String,
    pub grid_color: String,
    pub label_color: String,
    pub title_color: String,
    pub title_font_weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendStyle {
    pub title_color: String,
    pub label_color: String,
}

impl From<&SpecStyle> for StyleConfig {
    fn from(style: &SpecStyle) -> Self {
        Self {
            view: ViewStyle {
                stroke: style.view_stroke.clone(),
            },
            axis: AxisStyle {
                domain: false,
                tick_color: style.tick_color.clone(),
                grid_color: style.grid_color.clone(),
                label_color: style.label_color.clone(),
                title_color: style.title_color.clone(),
                title_font_weight: style.title_font_weight.clone(),
            },
            legend: LegendStyle {
                title_color: style.title_color.clone(),
                label_color: style.label_color.clone(),
            },
        }
    }
}

pub fn build_spec(
    mark: MarkKind,
    encoding: Encoding,
    records: &[Record],
    options: MarkOptions,
    style: &SpecStyle,
) -> ChartSpec {
    ChartSpec {
        schema: style.schema.clone(),
        width: "container".to_string(),
        height: style.height,
        autosize: Autosize {
            kind: "fit".to_string(),
            contains: "padding".to_string(),
        },
        data: InlineData {
            values: records.to_vec(),
        },
        mark: MarkDef {
            kind: mark,
            tooltip: true,
            inner_radius: options.inner_radius,
        },
        encoding,
        params: vec![SelectionParam {
            name: "grid".to_string(),
            select: "interval".to_string(),
            bind: "scales".to_string(),
        }],
        config: StyleConfig::from(style),
    }
}
