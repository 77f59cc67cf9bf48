use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Profile tabular data and suggest Vega-Lite charts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer column types and summary statistics for a dataset
    Profile(ProfileArgs),
    /// Rank chart suggestions that fit the dataset's column types
    Suggest(SuggestArgs),
    /// Check whether a chart category (or a chart image's file name) fits the dataset
    Check(CheckArgs),
    /// Build a chart from a free-text command such as "bar chart of Sales by Region"
    Command(CommandArgs),
}

/// Where the records come from and how to decode them.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Input CSV, TSV or JSON file (`-` reads CSV from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file overriding sampling, suggestion and style defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Emit the profile as JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Write the JSON profile to this file (stdout if omitted)
    #[arg(short = 'o', long = "output", requires = "json")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Emit every suggestion, specs included, as JSON
    #[arg(long, conflicts_with = "show")]
    pub json: bool,
    /// Emit only the spec of the suggestion with this rank
    #[arg(long)]
    pub show: Option<usize>,
    /// Write JSON output to this file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Chart category: line, bar, circle, arc, area or rect (aliases: scatter, point, pie, donut, heatmap)
    #[arg(long, required_unless_present = "image", conflicts_with = "image")]
    pub category: Option<String>,
    /// Chart image whose file name hints at the category (e.g. `q3_line.png`)
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// Emit the compatibility report as JSON
    #[arg(long)]
    pub json: bool,
    /// Write the spec (or JSON report) to this file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CommandArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Free-text command, e.g. "line chart of Revenue over Date" or "x=Date y=Revenue"
    pub text: String,
    /// Write the spec to this file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_names_resolve() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn check_requires_category_or_image() {
        assert!(Cli::try_parse_from(["chart-advisor", "check", "-i", "data.csv"]).is_err());
        assert!(
            Cli::try_parse_from([
                "chart-advisor",
                "check",
                "-i",
                "data.csv",
                "--category",
                "bar"
            ])
            .is_ok()
        );
    }
}
