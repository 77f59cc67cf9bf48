mod common;

use chart_advisor::{
    AdvisorConfig, ChartCategory, Record, check_compatibility,
    spec::{Aggregate, Channel, FieldType, MarkKind},
    suggest::Suggestion,
    suggest_charts, suggest_charts_with,
};
use proptest::prelude::*;

use common::{profile, region_sales_records, sales_records};

fn chart_types(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions
        .iter()
        .map(|suggestion| suggestion.chart_type.as_str())
        .collect()
}

#[test]
fn sales_catalogue_fires_in_order_and_pads_with_count_bar() {
    let records = sales_records();
    let suggestions = suggest_charts(&profile(&records), &records);
    assert_eq!(
        chart_types(&suggestions),
        vec![
            "Line Chart",
            "Bar Chart",
            "Scatter Plot",
            "Histogram",
            "Box Plot",
            "Heatmap",
            "Donut Chart",
            "Area Chart",
            "Grouped Bar",
            "Count Bar",
        ]
    );
    let filler = &suggestions[9];
    assert_eq!(filler.reason, "Frequency of Product.");
    assert_eq!(filler.mapping.get(&Channel::Y).map(String::as_str), Some("Count"));
}

#[test]
fn ranks_are_one_through_n() {
    let records = sales_records();
    let suggestions = suggest_charts(&profile(&records), &records);
    let ranks = suggestions.iter().map(|s| s.rank).collect::<Vec<_>>();
    assert_eq!(ranks, (1..=suggestions.len()).collect::<Vec<_>>());
}

#[test]
fn line_chart_leads_for_dated_sales() {
    let records = vec![
        Record::new()
            .with("Date", "2024-01-01")
            .with("Sales", 100.0)
            .with("Region", "East"),
        Record::new()
            .with("Date", "2024-01-02")
            .with("Sales", 150.0)
            .with("Region", "West"),
    ];
    let profile = profile(&records);
    let suggestions = suggest_charts(&profile, &records);
    let first = &suggestions[0];
    assert_eq!(first.rank, 1);
    assert_eq!(first.chart_type, "Line Chart");
    assert_eq!(first.reason, "Shows trends of Sales over time (Date).");

    let encoding = &first.spec.encoding;
    assert_eq!(first.spec.mark_kind(), MarkKind::Line);
    assert_eq!(encoding.field(Channel::X), Some("Date"));
    assert_eq!(
        encoding.get(Channel::X).and_then(|def| def.field_type),
        Some(FieldType::Temporal)
    );
    assert_eq!(encoding.field(Channel::Y), Some("Sales"));
    assert_eq!(
        encoding.get(Channel::Y).and_then(|def| def.field_type),
        Some(FieldType::Quantitative)
    );
    assert_eq!(encoding.field(Channel::Color), Some("Region"));

    let checked = check_compatibility("line", &profile, &records).expect("compatible");
    assert_eq!(checked, first.spec);
}

#[test]
fn filler_cycles_single_nominal_column() {
    let records = region_sales_records();
    let suggestions = suggest_charts(&profile(&records), &records);
    assert_eq!(suggestions.len(), 10);
    assert_eq!(
        chart_types(&suggestions[..4]),
        vec!["Bar Chart", "Histogram", "Box Plot", "Donut Chart"]
    );
    assert!(
        suggestions[4..]
            .iter()
            .all(|s| s.chart_type == "Count Bar" && s.reason == "Frequency of Region.")
    );
}

#[test]
fn temporal_heatmap_replaces_category_heatmap_with_one_nominal() {
    let records = vec![
        Record::new()
            .with("Month", "2024-01-01")
            .with("Team", "A")
            .with("Hours", 3.0),
        Record::new()
            .with("Month", "2024-02-01")
            .with("Team", "B")
            .with("Hours", 5.0),
    ];
    let suggestions = suggest_charts(&profile(&records), &records);
    let heatmap = suggestions
        .iter()
        .find(|s| s.chart_type == "Heatmap")
        .expect("heatmap");
    assert_eq!(heatmap.reason, "Shows intensity of Hours over time by Team.");
    let x = heatmap.spec.encoding.get(Channel::X).expect("x");
    assert_eq!(x.field_type, Some(FieldType::Ordinal));
    assert_eq!(x.time_unit.as_deref(), Some("month"));
    let color = heatmap.spec.encoding.get(Channel::Color).expect("color");
    assert_eq!(color.aggregate, Some(Aggregate::Sum));
}

#[test]
fn three_numeric_columns_add_bubble_chart() {
    let records = vec![
        Record::new().with("a", 1.0).with("b", 2.0).with("c", 3.0),
        Record::new().with("a", 4.0).with("b", 5.0).with("c", 6.0),
    ];
    let suggestions = suggest_charts(&profile(&records), &records);
    assert_eq!(
        chart_types(&suggestions),
        vec!["Scatter Plot", "Histogram", "Bubble Chart"]
    );
    let bubble = &suggestions[2];
    assert_eq!(bubble.spec.encoding.field(Channel::Size), Some("c"));
    let scatter = &suggestions[0];
    assert_eq!(scatter.spec.encoding.field(Channel::Size), Some("c"));
}

#[test]
fn text_only_dataset_yields_no_suggestions() {
    let records = vec![Record::new().with("Name", "a"), Record::new().with("Name", "b")];
    assert!(suggest_charts(&profile(&records), &records).is_empty());
}

#[test]
fn max_suggestions_truncates_the_list() {
    let records = sales_records();
    let config = AdvisorConfig {
        max_suggestions: 3,
        ..AdvisorConfig::default()
    };
    let suggestions = suggest_charts_with(&profile(&records), &records, &config);
    assert_eq!(
        chart_types(&suggestions),
        vec!["Line Chart", "Bar Chart", "Scatter Plot"]
    );
}

#[test]
fn donut_uses_configured_inner_radius() {
    let records = region_sales_records();
    let config = AdvisorConfig {
        donut_inner_radius: 80,
        ..AdvisorConfig::default()
    };
    let suggestions = suggest_charts_with(&profile(&records), &records, &config);
    let donut = suggestions
        .iter()
        .find(|s| s.chart_type == "Donut Chart")
        .expect("donut");
    assert_eq!(donut.spec.mark.inner_radius, Some(80));
}

#[test]
fn detected_category_wraps_spec_as_single_suggestion() {
    let records = region_sales_records();
    let profile = profile(&records);
    let spec = check_compatibility("bar", &profile, &records).expect("compatible");
    let suggestion = Suggestion::detected(ChartCategory::Bar, spec);
    assert_eq!(suggestion.rank, 1);
    assert_eq!(suggestion.chart_type, "Bar Chart");
    assert_eq!(
        suggestion.reason,
        "The chart type detected in the uploaded image (bar) is compatible with your data."
    );
    assert_eq!(
        suggestion.mapping.get(&Channel::X).map(String::as_str),
        Some("Region")
    );
}

fn column_kind() -> impl Strategy<Value = u8> {
    0u8..3
}

proptest! {
    #[test]
    fn ranks_are_gapless_for_generated_schemas(
        kinds in proptest::collection::vec(column_kind(), 1..7),
        max in 1usize..=10
    ) {
        let record = kinds
            .iter()
            .enumerate()
            .fold(Record::new(), |record, (idx, kind)| {
                let name = format!("c{idx}");
                match kind {
                    0 => record.with(name, idx as f64),
                    1 => record.with(name, "2024-03-01"),
                    _ => record.with(name, "label"),
                }
            });
        let records = vec![record];
        let config = AdvisorConfig {
            max_suggestions: max,
            ..AdvisorConfig::default()
        };
        let suggestions = suggest_charts_with(&profile(&records), &records, &config);
        prop_assert!(suggestions.len() <= max);
        for (idx, suggestion) in suggestions.iter().enumerate() {
            prop_assert_eq!(suggestion.rank, idx + 1);
        }
    }
}
