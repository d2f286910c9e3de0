//! Loose comparison between values of mixed types.
//!
//! Filters and sorting compare stored values with caller-supplied values
//! that need not share a type. The coercion rules, in priority order:
//!
//! 1. either side `Bool`: both sides compared by truthiness
//! 2. `Null` against `Text`: null is the empty string
//! 3. `Null` against anything else: both sides compared by truthiness
//! 4. number against number: numeric (integers and floats mix)
//! 5. number against `Text`: numeric when the text is a numeric string,
//!    otherwise the number's rendering is compared bytewise with the text
//! 6. `Text` against `Text`: numeric when both are numeric strings,
//!    otherwise bytewise
//!
//! NaN is unordered: [`Value::loose_cmp`] returns `None`.

use crate::value::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn cmp(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Parses a numeric string: optional surrounding whitespace, sign, digits,
/// fraction and exponent. `inf`/`nan` spellings are not numeric.
fn parse_numeric(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || !trimmed.bytes().any(|b| b.is_ascii_digit())
        || !trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Number::Int(n));
    }
    trimmed.parse::<f64>().ok().map(Number::Float)
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Integer(n) => Some(Number::Int(*n)),
        Value::Float(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

impl Value {
    /// Compares two values using the loose coercion rules of this module.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(_), _) | (_, Value::Bool(_)) => {
                Some(self.truthy().cmp(&other.truthy()))
            }
            (Value::Null, Value::Text(s)) => Some("".cmp(s.as_str())),
            (Value::Text(s), Value::Null) => Some(s.as_str().cmp("")),
            (Value::Null, _) | (_, Value::Null) => Some(self.truthy().cmp(&other.truthy())),
            (Value::Text(a), Value::Text(b)) => match (parse_numeric(a), parse_numeric(b)) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => Some(a.as_bytes().cmp(b.as_bytes())),
            },
            (Value::Text(s), n) => text_vs_number(s, n).map(Ordering::reverse),
            (n, Value::Text(s)) => text_vs_number(s, n),
            (a, b) => match (as_number(a), as_number(b)) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => None,
            },
        }
    }

    /// Loose equality: `loose_cmp` reports `Equal`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.loose_cmp(other) == Some(Ordering::Equal)
    }
}

/// Orders `number` relative to the text `s` (`number.cmp(s)`).
fn text_vs_number(s: &str, number: &Value) -> Option<Ordering> {
    let n = as_number(number)?;
    match parse_numeric(s) {
        Some(parsed) => n.cmp(parsed),
        None => Some(number.render().as_bytes().cmp(s.as_bytes())),
    }
}

/// Total-order sort key for a value; see [`Value::sort_key`].
///
/// Classes sort as null, bools, numbers, then non-numeric text. Numeric
/// text sorts with the numbers. Numbers use [`f64::total_cmp`] with the
/// exact integer as a tie-break, so NaN sorts after every other number.
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    /// `Null`.
    Null,
    /// `Bool`.
    Bool(bool),
    /// An integer, float or numeric string.
    Number(f64, Option<i64>),
    /// Non-numeric text.
    Text(&'a str),
}

impl SortKey<'_> {
    fn class(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Number(..) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a, x), SortKey::Number(b, y)) => {
                a.total_cmp(b).then_with(|| x.cmp(y))
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            _ => self.class().cmp(&other.class()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

fn number_key<'a>(number: Number) -> SortKey<'a> {
    match number {
        Number::Int(n) => SortKey::Number(n as f64, Some(n)),
        Number::Float(f) => SortKey::Number(f, None),
    }
}

impl Value {
    /// Returns a key that orders values totally.
    ///
    /// Within numbers and within non-numeric text it agrees with
    /// [`Value::loose_cmp`]. Across classes, where loose comparison is not
    /// transitive, the class order decides.
    pub fn sort_key(&self) -> SortKey<'_> {
        match self {
            Value::Null => SortKey::Null,
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Integer(n) => number_key(Number::Int(*n)),
            Value::Float(f) => number_key(Number::Float(*f)),
            Value::Text(s) => parse_numeric(s).map_or(SortKey::Text(s), number_key),
        }
    }
}
