//! Filter conditions.

use crate::error::{CoreError, CoreResult};
use rediso_codec::{Record, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `=`
    Eq,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `!=`
    Ne,
}

impl Operator {
    /// Returns the operator's textual form.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Eq => "=",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Ne => "!=",
        }
    }

    /// Decides the operator from a loose comparison result.
    ///
    /// `None` (an unordered pair, i.e. NaN) satisfies only `!=`.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Operator::Ne, ordering) => ordering != Some(Ordering::Equal),
            (_, None) => false,
            (Operator::Gt, Some(o)) => o == Ordering::Greater,
            (Operator::Lt, Some(o)) => o == Ordering::Less,
            (Operator::Eq, Some(o)) => o == Ordering::Equal,
            (Operator::Le, Some(o)) => o != Ordering::Greater,
            (Operator::Ge, Some(o)) => o != Ordering::Less,
        }
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            "=" => Ok(Operator::Eq),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            "!=" => Ok(Operator::Ne),
            other => Err(CoreError::configuration(
                "search_all",
                format!("unknown operator `{other}`"),
            )),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A `(field, operator, value)` filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Record field to test.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand side of the comparison.
    pub value: Value,
}

impl Predicate {
    /// Creates a predicate.
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates a predicate from operator text such as `"<="`.
    ///
    /// # Errors
    ///
    /// `Configuration` for an unrecognized operator.
    pub fn parse(field: impl Into<String>, op: &str, value: impl Into<Value>) -> CoreResult<Self> {
        Ok(Self::new(field, op.parse()?, value))
    }

    /// Tests the predicate against a record.
    ///
    /// # Errors
    ///
    /// `FieldNotFound` if the record has no such field.
    pub fn matches(&self, record: &Record) -> CoreResult<bool> {
        let stored = record
            .get(&self.field)
            .ok_or_else(|| CoreError::field_not_found("search_all", self.field.as_str()))?;
        Ok(self.op.holds(stored.loose_cmp(&self.value)))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}
