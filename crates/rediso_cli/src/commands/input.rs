//! Parsing of record files and query arguments.

use rediso_codec::{from_json, CodecError, Record, Value};
use rediso_core::{CoreError, Predicate};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading command input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be read.
    #[error("cannot read {path:?}: {source}")]
    Io {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line of JSON-lines input is not a JSON object of scalars.
    #[error("record {index}: {source}")]
    Record {
        /// Zero-based position of the record.
        index: usize,
        /// The decoding error.
        #[source]
        source: CodecError,
    },

    /// The input starts like a JSON array but is not an array of records.
    #[error("input is not a JSON array of records: {0}")]
    NotAnArray(#[from] serde_json::Error),

    /// A `--where` clause could not be parsed.
    #[error("invalid filter `{clause}`: expected <field><op><value>")]
    Filter {
        /// The clause as given.
        clause: String,
    },

    /// A `--match` argument could not be parsed.
    #[error("invalid field search `{0}`: expected <field>=<term>")]
    FieldSearch(String),

    /// The store rejected the clause.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Reads records from `path`.
///
/// Accepts a JSON array of objects, or one object per line. Blank lines are
/// skipped. Records must not carry an `id`; the store assigns it.
pub fn load_records(path: &Path) -> Result<Vec<Record>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text)
}

/// Parses records from file contents. See [`load_records`].
pub fn parse_records(text: &str) -> Result<Vec<Record>, InputError> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| from_json(line).map_err(|source| InputError::Record { index, source }))
        .collect()
}

/// Parses a filter clause such as `age>=30` or `name = alice`.
///
/// The value is read as a JSON scalar when it parses as one (`30`, `true`,
/// `null`, `"quoted"`), otherwise as plain text.
pub fn parse_filter(clause: &str) -> Result<Predicate, InputError> {
    let invalid = || InputError::Filter {
        clause: clause.to_string(),
    };
    let start = clause.find(['<', '>', '=', '!']).ok_or_else(invalid)?;
    let (field, rest) = clause.split_at(start);
    let field = field.trim();
    if field.is_empty() {
        return Err(invalid());
    }
    let op_len = rest
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '!'))
        .unwrap_or(rest.len());
    let (op, value) = rest.split_at(op_len);
    Ok(Predicate::parse(field, op, parse_scalar(value.trim()))?)
}

/// Parses a field search such as `name=ali`.
pub fn parse_field_search(arg: &str) -> Result<(String, String), InputError> {
    match arg.split_once('=') {
        Some((field, term)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), term.to_string()))
        }
        _ => Err(InputError::FieldSearch(arg.to_string())),
    }
}

fn parse_scalar(text: &str) -> Value {
    serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::from(text))
}
