mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{SALES_CSV, TestWorkspace};

fn advisor() -> Command {
    Command::cargo_bin("chart-advisor").expect("binary exists")
}

#[test]
fn profile_prints_table_with_types() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args(["profile", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Rows: 6"))
        .stdout(contains("temporal"))
        .stdout(contains("mean=102.625"));
}

#[test]
fn profile_json_reports_column_types() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    let output = advisor()
        .args(["profile", "-i", input.to_str().unwrap(), "--json"])
        .output()
        .expect("run profile");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["row_count"], 6);
    assert_eq!(json["columns"]["Date"]["type"], "temporal");
    assert_eq!(json["columns"]["Units"]["stats"]["max"], 5.0);
}

#[test]
fn suggest_lists_ranked_charts() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args(["suggest", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Line Chart"))
        .stdout(contains("x=Date, y=Sales, color=Region"))
        .stdout(contains("Count Bar"));
}

#[test]
fn suggest_show_writes_selected_spec() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    let output = workspace.path().join("scatter.json");
    advisor()
        .args([
            "suggest",
            "-i",
            input.to_str().unwrap(),
            "--show",
            "3",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read spec")).expect("json");
    assert_eq!(spec["mark"]["type"], "circle");
    assert_eq!(spec["data"]["values"].as_array().map(Vec::len), Some(6));
}

#[test]
fn suggest_show_out_of_range_fails() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args(["suggest", "-i", input.to_str().unwrap(), "--show", "42"])
        .assert()
        .failure()
        .stderr(contains("No suggestion with rank 42"));
}

#[test]
fn check_category_emits_spec() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args(["check", "-i", input.to_str().unwrap(), "--category", "donut"])
        .assert()
        .success()
        .stdout(contains("\"innerRadius\": 50"));
}

#[test]
fn check_incompatible_category_fails_with_reason() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("regions.csv", "Region,Sales\nNorth,10\nSouth,20\n");
    advisor()
        .args(["check", "-i", input.to_str().unwrap(), "--category", "line"])
        .assert()
        .failure()
        .stderr(contains(
            "Line chart requires at least one Date and one Numeric column.",
        ));
}

#[test]
fn check_json_reports_incompatibility() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("regions.csv", "Region,Sales\nNorth,10\nSouth,20\n");
    let output = advisor()
        .args([
            "check",
            "-i",
            input.to_str().unwrap(),
            "--category",
            "scatter",
            "--json",
        ])
        .output()
        .expect("run check");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["compatible"], false);
    assert_eq!(
        report["reason"],
        "Scatter plot requires at least two Numeric columns."
    );
}

#[test]
fn check_image_name_hints_category() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args([
            "check",
            "-i",
            input.to_str().unwrap(),
            "--image",
            "uploads/q1_area.png",
        ])
        .assert()
        .success()
        .stdout(contains("\"type\": \"area\""));

    advisor()
        .args([
            "check",
            "-i",
            input.to_str().unwrap(),
            "--image",
            "uploads/photo.png",
        ])
        .assert()
        .failure()
        .stderr(contains("pass --category"));
}

#[test]
fn command_builds_bar_spec_from_json_input() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "sales.json",
        r#"[{"Date":"2024-01-01","Sales":100,"Region":"East"},
            {"Date":"2024-01-02","Sales":150,"Region":"West"}]"#,
    );
    let output = advisor()
        .args([
            "command",
            "-i",
            input.to_str().unwrap(),
            "draw a bar chart of Sales by Region",
        ])
        .output()
        .expect("run command");
    assert!(output.status.success());
    let spec: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(spec["mark"]["type"], "bar");
    assert_eq!(spec["encoding"]["x"]["field"], "Region");
    assert_eq!(spec["encoding"]["y"]["aggregate"], "sum");
    assert_eq!(spec["data"]["values"][0]["Sales"], 100.0);
}

#[test]
fn command_without_columns_fails() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    advisor()
        .args(["command", "-i", input.to_str().unwrap(), "make it pretty"])
        .assert()
        .failure()
        .stderr(contains("Command not understood"));
}

#[test]
fn semicolon_delimiter_and_stdin_are_supported() {
    let input = SALES_CSV.replace(',', ";");
    advisor()
        .args(["profile", "-i", "-", "--delimiter", ";", "--json"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("\"quantitative\""));
}

#[test]
fn header_only_input_is_empty_dataset() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("empty.csv", "a,b\n");
    advisor()
        .args(["suggest", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Empty dataset"));
}

#[test]
fn config_file_limits_suggestions() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    let config = workspace.write("advisor.yaml", "max_suggestions: 2\n");
    let output = advisor()
        .args([
            "suggest",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("run suggest");
    assert!(output.status.success());
    let suggestions: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(suggestions.as_array().map(Vec::len), Some(2));
}

#[test]
fn config_cannot_raise_suggestion_cap() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    let config = workspace.write("advisor.yaml", "max_suggestions: 15\n");
    advisor()
        .args([
            "suggest",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("max_suggestions must be between 1 and 10"));
}

#[test]
fn invalid_config_is_reported() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sales.csv", SALES_CSV);
    let config = workspace.write("advisor.yaml", "max_sugestions: 2\n");
    advisor()
        .args([
            "profile",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Parsing config file"));
}
