//! Record decoding and document output.
//!
//! All file I/O flows through this module:
//!
//! - **Format resolution**: `.json` files hold an array of objects; anything
//!   else is delimited text (`.tsv` → tab, otherwise comma) unless the
//!   delimiter is overridden.
//! - **Encoding**: delimited input is decoded via `encoding_rs`, defaulting
//!   to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.
//!
//! Delimited cells stay text ([`Value::Text`]); empty cells become missing.
//! JSON keeps its native numbers and nulls.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::data::{Record, Value};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited(u8),
    Json,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// An explicit delimiter always selects delimited input.
pub fn resolve_input_format(path: &Path, delimiter: Option<u8>) -> InputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") && delimiter.is_none() => InputFormat::Json,
        _ => InputFormat::Delimited(resolve_input_delimiter(path, delimiter)),
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if is_dash(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        )))
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads every row of `path` into memory.
pub fn read_records(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<Vec<Record>> {
    let format = resolve_input_format(path, delimiter);
    debug!("Reading {path:?} as {format:?} ({})", encoding.name());
    let reader = open_input(path)?;
    let records = match format {
        InputFormat::Delimited(delimiter) => read_delimited(reader, delimiter, encoding),
        InputFormat::Json => read_json(reader),
    }
    .with_context(|| format!("Reading records from {path:?}"))?;
    debug!("Loaded {} record(s) from {path:?}", records.len());
    Ok(records)
}

pub fn read_delimited<R>(reader: R, delimiter: u8, encoding: &'static Encoding) -> Result<Vec<Record>>
where
    R: Read,
{
    let mut reader = open_csv_reader(reader, delimiter);
    let headers = decode_record(reader.byte_headers()?, encoding)?;
    let mut records = Vec::new();
    for (idx, row) in reader.byte_records().enumerate() {
        let row = row.with_context(|| format!("Reading row {}", idx + 2))?;
        let cells = decode_record(&row, encoding)
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let value = cells
                    .get(col)
                    .map_or(Value::Missing, |cell| Value::from_raw(cell));
                (header.clone(), value)
            })
            .collect::<Record>();
        records.push(record);
    }
    Ok(records)
}

pub fn read_json<R>(reader: R) -> Result<Vec<Record>>
where
    R: Read,
{
    let document: serde_json::Value =
        serde_json::from_reader(reader).context("Parsing JSON document")?;
    let serde_json::Value::Array(rows) = document else {
        bail!("Expected a JSON array of objects");
    };
    rows.iter()
        .enumerate()
        .map(|(idx, row)| match row {
            serde_json::Value::Object(object) => Ok(Record::from_json_object(object)),
            other => Err(anyhow!(
                "Element {idx} is not an object (found {})",
                json_kind(other)
            )),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Writes `contents` to `path`, or to stdout when `path` is absent or `-`.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout().lock()),
    };
    writer.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
