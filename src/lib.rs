pub mod cli;
pub mod command;
pub mod compat;
pub mod config;
pub mod data;
pub mod error;
pub mod frequency;
pub mod io_utils;
pub mod profile;
pub mod spec;
pub mod stats;
pub mod suggest;
pub mod table;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, info, warn};

use crate::cli::{Cli, Commands, SourceArgs};

pub use crate::{
    command::{interpret_command, interpret_command_with},
    compat::{
        ChartCategory, CompatibilityReport, check_category, check_compatibility,
        check_compatibility_with,
    },
    config::AdvisorConfig,
    data::{Record, Value},
    error::AdvisorError,
    profile::{
        ColumnProfile, DatasetProfile, SemanticType, profile_records, profile_records_with,
    },
    spec::{ChartSpec, build_spec},
    stats::Statistics,
    suggest::{Suggestion, suggest_charts, suggest_charts_with},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("chart_advisor", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Profile(args) => handle_profile(&args),
        Commands::Suggest(args) => handle_suggest(&args),
        Commands::Check(args) => handle_check(&args),
        Commands::Command(args) => handle_command(&args),
    }
}

/// Records, their profile and the active configuration for one invocation.
struct Loaded {
    config: AdvisorConfig,
    records: Vec<Record>,
    profile: DatasetProfile,
}

fn load(source: &SourceArgs) -> Result<Loaded> {
    let config = AdvisorConfig::load_or_default(source.config.as_deref())?;
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    debug!(
        "Loading '{}' with delimiter '{}'",
        source.input.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(
            &source.input,
            source.delimiter
        ))
    );
    let records = io_utils::read_records(&source.input, source.delimiter, encoding)?;
    let profile = profile_records_with(&records, &config.profile_options())
        .with_context(|| format!("Profiling {:?}", source.input))?;
    info!(
        "Profiled {} row(s) across {} column(s) from {:?}",
        profile.row_count,
        profile.column_names.len(),
        source.input
    );
    Ok(Loaded {
        config,
        records,
        profile,
    })
}

fn write_json<T: serde::Serialize>(output: Option<&Path>, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Serializing JSON output")?;
    io_utils::write_output(output, &rendered)?;
    if let Some(path) = output.filter(|path| !io_utils::is_dash(path)) {
        info!("Wrote {path:?}");
    }
    Ok(())
}

fn handle_profile(args: &cli::ProfileArgs) -> Result<()> {
    let loaded = load(&args.source)?;
    let profile = &loaded.profile;
    if args.json {
        return write_json(args.output.as_deref(), profile);
    }

    let headers = ["column", "type", "missing", "unique", "summary"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = profile
        .iter()
        .map(|(name, column)| {
            vec![
                name.to_string(),
                column.semantic_type.to_string(),
                stats::format_number(column.missing_ratio),
                column.unique_count.to_string(),
                summarize(&column.stats),
            ]
        })
        .collect::<Vec<_>>();
    println!("Rows: {}", profile.row_count);
    table::print_table(&headers, &rows);
    Ok(())
}

fn summarize(statistics: &Statistics) -> String {
    match statistics {
        Statistics::Numeric(summary) => format!(
            "mean={} median={} min={} max={}",
            stats::format_number(summary.mean),
            stats::format_number(summary.median),
            stats::format_number(summary.min),
            stats::format_number(summary.max)
        ),
        Statistics::Categorical { top_values } => format!("top: {}", top_values.join(", ")),
    }
}

fn handle_suggest(args: &cli::SuggestArgs) -> Result<()> {
    let loaded = load(&args.source)?;
    let suggestions = suggest_charts_with(&loaded.profile, &loaded.records, &loaded.config);
    if suggestions.is_empty() {
        warn!(
            "No chart suggestion fits the column types of {:?}",
            args.source.input
        );
    } else {
        info!("Generated {} suggestion(s)", suggestions.len());
    }

    if let Some(rank) = args.show {
        let suggestion = suggestions
            .iter()
            .find(|suggestion| suggestion.rank == rank)
            .ok_or_else(|| {
                anyhow!(
                    "No suggestion with rank {rank} ({} available)",
                    suggestions.len()
                )
            })?;
        return write_json(args.output.as_deref(), &suggestion.spec);
    }
    if args.json || args.output.is_some() {
        return write_json(args.output.as_deref(), &suggestions);
    }

    let headers = ["rank", "chart", "mapping", "reason"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = suggestions
        .iter()
        .map(|suggestion| {
            vec![
                suggestion.rank.to_string(),
                suggestion.chart_type.clone(),
                suggestion
                    .mapping
                    .iter()
                    .map(|(channel, column)| format!("{channel}={column}"))
                    .join(", "),
                suggestion.reason.clone(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_check(args: &cli::CheckArgs) -> Result<()> {
    let category = match (&args.category, &args.image) {
        (Some(label), _) => label.parse::<ChartCategory>(),
        (None, Some(image)) => {
            let name = image
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let category = ChartCategory::from_file_hint(&name).ok_or_else(|| {
                anyhow!("Could not infer a chart category from {image:?}; pass --category")
            })?;
            info!("Image {image:?} suggests a {category} chart");
            Ok(category)
        }
        (None, None) => bail!("Either --category or --image is required"),
    };

    let loaded = load(&args.source)?;
    let result = category.and_then(|category| {
        check_category(category, &loaded.profile, &loaded.records, &loaded.config)
            .map(|spec| (category, spec))
    });

    if args.json {
        let report = CompatibilityReport::from(result.map(|(_, spec)| spec));
        return write_json(args.output.as_deref(), &report);
    }
    match result {
        Ok((category, spec)) => {
            if args.image.is_some() {
                info!("{}", Suggestion::detected(category, spec.clone()).reason);
            } else {
                info!("Category '{category}' is compatible");
            }
            write_json(args.output.as_deref(), &spec)
        }
        Err(err) => bail!(err.user_message()),
    }
}

fn handle_command(args: &cli::CommandArgs) -> Result<()> {
    let loaded = load(&args.source)?;
    match interpret_command_with(&args.text, &loaded.profile, &loaded.records, &loaded.config) {
        Ok(spec) => write_json(args.output.as_deref(), &spec),
        Err(err) => bail!(err.user_message()),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
