//! Search command implementation.
//!
//! Loads records from a file into an in-memory store, then runs one
//! `search_all` over them.

use super::input::{load_records, parse_field_search, parse_filter};
use super::Format;
use rediso_core::{Config, Limit, Rediso, SearchOptions, SearchResult, SortOrder};
use rediso_storage::InMemoryStore;
use std::path::Path;

/// Query arguments of the search command.
#[derive(Debug, Default)]
pub struct SearchArgs {
    /// Collection the records are loaded into.
    pub collection: String,
    /// Fields to build index tables for while loading.
    pub index: Vec<String>,
    /// Filter clauses, OR-combined.
    pub filters: Vec<String>,
    /// `field=term` searches.
    pub matches: Vec<String>,
    /// Global search term.
    pub term: Option<String>,
    /// Sort field.
    pub order_by: Option<String>,
    /// Sort direction text.
    pub order: Option<String>,
    /// Page size.
    pub limit: Option<usize>,
    /// Records skipped before the page.
    pub offset: Option<usize>,
}

impl SearchArgs {
    /// Builds search options from the arguments.
    pub fn options(&self) -> Result<SearchOptions, Box<dyn std::error::Error>> {
        let mut options = SearchOptions::new();
        for clause in &self.filters {
            options = options.predicate(parse_filter(clause)?);
        }

        if let Some(term) = &self.term {
            options = options.search_global(term.clone());
        } else if !self.matches.is_empty() {
            let terms = self
                .matches
                .iter()
                .map(|arg| parse_field_search(arg))
                .collect::<Result<Vec<_>, _>>()?;
            options = options.search_fields(terms);
        }

        if let Some(field) = &self.order_by {
            let order = match &self.order {
                Some(text) => text.parse::<SortOrder>()?,
                None => SortOrder::Asc,
            };
            options = options.order_by(field.clone(), order);
        }

        let limit = match (self.offset, self.limit) {
            (Some(offset), Some(count)) => Limit::Window { offset, count },
            (Some(offset), None) => Limit::Window {
                offset,
                count: usize::MAX,
            },
            (None, Some(count)) => Limit::First(count),
            (None, None) => Limit::None,
        };
        Ok(options.limit(limit))
    }
}

/// Runs the search command.
pub fn run(
    input: &Path,
    namespace: &str,
    args: &SearchArgs,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options()?;
    let result = execute(input, namespace, args, &options)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => {
            println!(
                "{} of {} records in '{}'",
                result.count, result.count_all, args.collection
            );
            println!();
            for record in &result.records {
                println!("{}", rediso_codec::to_json(record)?);
            }
        }
    }
    Ok(())
}

/// Loads `input` and searches it.
pub fn execute(
    input: &Path,
    namespace: &str,
    args: &SearchArgs,
    options: &SearchOptions,
) -> Result<SearchResult, Box<dyn std::error::Error>> {
    let records = load_records(input)?;
    let mut db = Rediso::open(InMemoryStore::new(), Config::new().namespace(namespace))?;

    let index: Vec<&str> = args.index.iter().map(String::as_str).collect();
    for record in records {
        db.insert(&args.collection, record, &index)?;
    }
    tracing::debug!(
        collection = %args.collection,
        loaded = db.stats().inserts(),
        "records loaded"
    );

    Ok(db.search_all(&args.collection, options)?)
}
