#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chart_advisor::{DatasetProfile, Record, profile_records};
use tempfile::{TempDir, tempdir};

/// Date (temporal), Region and Product (nominal), Sales and Units (quantitative).
pub const SALES_CSV: &str = "\
Date,Region,Product,Sales,Units
2024-01-01,North,Widget,120.5,3
2024-01-02,South,Gadget,80,2
2024-01-03,North,Gadget,95.25,4
2024-01-04,East,Widget,150,5
2024-01-05,South,Widget,60,1
2024-01-06,East,Gadget,110,3
";

/// Builds records from `(column, cell)` rows, treating `""` as missing.
pub fn records(rows: &[&[(&str, &str)]]) -> Vec<Record> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, cell)| (key.to_string(), chart_advisor::Value::from_raw(cell)))
                .collect()
        })
        .collect()
}

/// The rows of [`SALES_CSV`] as records, cells kept as text.
pub fn sales_records() -> Vec<Record> {
    let mut lines = SALES_CSV.lines();
    let headers = lines
        .next()
        .expect("header line")
        .split(',')
        .collect::<Vec<_>>();
    lines
        .map(|line| {
            headers
                .iter()
                .zip(line.split(','))
                .map(|(header, cell)| (header.to_string(), chart_advisor::Value::from_raw(cell)))
                .collect()
        })
        .collect()
}

/// Region/Sales pairs: one nominal and one quantitative column.
pub fn region_sales_records() -> Vec<Record> {
    records(&[
        &[("Region", "North"), ("Sales", "10")],
        &[("Region", "South"), ("Sales", "20")],
        &[("Region", "North"), ("Sales", "5")],
    ])
}

pub fn profile(records: &[Record]) -> DatasetProfile {
    profile_records(records).expect("profile")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
