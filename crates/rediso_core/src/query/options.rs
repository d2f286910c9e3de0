//! Search options and results.

use crate::error::CoreError;
use crate::query::predicate::{Operator, Predicate};
use rediso_codec::{Record, Value};
use serde::Serialize;
use std::str::FromStr;

/// Free-text search over records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSpec {
    /// Case-insensitive substring match on named fields; any hit selects the row.
    Fields(Vec<(String, String)>),
    /// Case-insensitive substring match on all values joined with `|`.
    Global(String),
}

impl SearchSpec {
    /// Returns false when the search cannot select anything on its own
    /// (no fields, or an empty global term).
    pub fn is_active(&self) -> bool {
        match self {
            SearchSpec::Fields(fields) => !fields.is_empty(),
            SearchSpec::Global(term) => !term.is_empty(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(CoreError::configuration(
                "search_all",
                format!("unknown sort order `{s}`"),
            )),
        }
    }
}

/// Pagination of a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    /// Every selected record.
    #[default]
    None,
    /// The first `n` records; `0` means all of them.
    First(usize),
    /// `count` records starting at position `offset`.
    Window {
        /// Records skipped.
        offset: usize,
        /// Records kept.
        count: usize,
    },
}

impl Limit {
    /// Builds a limit from a `[n]` or `[offset, count]` slice.
    ///
    /// Extra elements are ignored; an empty slice is [`Limit::None`].
    pub fn from_slice(values: &[usize]) -> Self {
        match values {
            [] => Limit::None,
            [n] => Limit::First(*n),
            [offset, count, ..] => Limit::Window {
                offset: *offset,
                count: *count,
            },
        }
    }

    /// Cuts `items` down to the page this limit describes.
    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        match self {
            Limit::None | Limit::First(0) => items,
            Limit::First(n) => items.into_iter().take(n).collect(),
            Limit::Window { offset, count } => items.into_iter().skip(offset).take(count).collect(),
        }
    }
}

/// Everything [`crate::QueryEngine::search_all`] needs besides the collection.
///
/// ```rust,ignore
/// let options = SearchOptions::new()
///     .filter("id", Operator::Lt, 4)
///     .filter("id", Operator::Eq, 9)
///     .order_by("id", SortOrder::Desc)
///     .limit(Limit::First(3));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOptions {
    /// OR-combined filter conditions.
    pub predicates: Vec<Predicate>,
    /// Optional free-text search, OR-combined with the predicates.
    pub search: Option<SearchSpec>,
    /// Field to sort by; `None` keeps fetch order.
    pub order_by: Option<String>,
    /// Sort direction.
    pub order: SortOrder,
    /// Pagination.
    pub limit: Limit,
}

impl SearchOptions {
    /// Creates options selecting every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate.
    #[must_use]
    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Adds a `(field, op, value)` predicate.
    #[must_use]
    pub fn filter(self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.predicate(Predicate::new(field, op, value))
    }

    /// Sets the search.
    #[must_use]
    pub fn search(mut self, search: SearchSpec) -> Self {
        self.search = Some(search);
        self
    }

    /// Searches `term` in every field.
    #[must_use]
    pub fn search_global(self, term: impl Into<String>) -> Self {
        self.search(SearchSpec::Global(term.into()))
    }

    /// Searches per field; a row matches if any field contains its term.
    #[must_use]
    pub fn search_fields<K, V>(self, terms: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.search(SearchSpec::Fields(
            terms
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Sorts by `field`.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some(field.into());
        self.order = order;
        self
    }

    /// Sets the pagination.
    #[must_use]
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    /// Returns true when the options filter rows at all.
    pub fn has_filters(&self) -> bool {
        !self.predicates.is_empty() || self.search.as_ref().is_some_and(SearchSpec::is_active)
    }
}

/// Output of a search.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResult {
    /// Records returned after pagination.
    pub count: usize,
    /// Records considered before filtering.
    pub count_all: usize,
    /// The page of records.
    pub records: Vec<Record>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn limit_from_slice() {
        assert_eq!(Limit::from_slice(&[]), Limit::None);
        assert_eq!(Limit::from_slice(&[5]), Limit::First(5));
        assert_eq!(
            Limit::from_slice(&[2, 3, 99]),
            Limit::Window { offset: 2, count: 3 }
        );
    }

    #[test]
    fn limit_apply() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Limit::None.apply(items.clone()).len(), 10);
        assert_eq!(Limit::First(0).apply(items.clone()).len(), 10);
        assert_eq!(Limit::First(3).apply(items.clone()), vec![0, 1, 2]);
        assert_eq!(
            Limit::Window { offset: 2, count: 3 }.apply(items.clone()),
            vec![2, 3, 4]
        );
        assert!(Limit::Window { offset: 20, count: 3 }.apply(items).is_empty());
    }

    #[test]
    fn sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!(
            "sideways".parse::<SortOrder>().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn builder() {
        let options = SearchOptions::new()
            .filter("id", Operator::Lt, 4)
            .search_fields([("name", "al")])
            .order_by("id", SortOrder::Desc)
            .limit(Limit::First(2));
        assert_eq!(options.predicates.len(), 1);
        assert_eq!(
            options.search,
            Some(SearchSpec::Fields(vec![("name".into(), "al".into())]))
        );
        assert_eq!(options.order_by.as_deref(), Some("id"));
        assert_eq!(options.order, SortOrder::Desc);
        assert!(options.has_filters());
    }

    #[test]
    fn empty_search_does_not_filter() {
        assert!(!SearchOptions::new().has_filters());
        assert!(!SearchOptions::new().search_global("").has_filters());
        assert!(SearchOptions::new().search_global("x").has_filters());
    }

    proptest::proptest! {
        #[test]
        fn window_is_a_contiguous_slice(len in 0usize..40, offset in 0usize..50, count in 0usize..50) {
            let items: Vec<usize> = (0..len).collect();
            let page = Limit::Window { offset, count }.apply(items);
            proptest::prop_assert!(page.len() <= count);
            let expected: Vec<usize> = (offset..len).take(count).collect();
            proptest::prop_assert_eq!(page, expected);
        }
    }

    #[test]
    fn result_serializes() {
        let result = SearchResult {
            count: 1,
            count_all: 2,
            records: vec![[("id", 1)].into_iter().collect()],
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"count":1,"count_all":2,"records":[{"id":1}]}"#
        );
    }
}
