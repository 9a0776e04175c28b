//! Filter specifications and the predicate compiler
//!
//! A [`FilterSpec`] is the loosely typed mapping a client sends
//! (`{"colors": ["U"], "mana_value__lte": 3}`). [`compile`] validates it
//! against an [`AttributeSchema`] and produces a conjunction of typed
//! [`Predicate`]s that a card store evaluates row by row.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::card::{Card, Column};
use crate::schema::{AttributeKind, AttributeSchema};
use crate::{Error, Result};

pub trait Filter {
    fn matches(&self, card: &Card) -> bool;
}

/// Range comparison operator, spelled as a `__gte`/`__lte`/`__gt`/`__lt` key suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    Gte,
    Lte,
    Gt,
    Lt,
}

impl RangeOp {
    pub fn from_suffix(suffix: &str) -> Option<RangeOp> {
        match suffix {
            "gte" => Some(RangeOp::Gte),
            "lte" => Some(RangeOp::Lte),
            "gt" => Some(RangeOp::Gt),
            "lt" => Some(RangeOp::Lt),
            _ => None,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            RangeOp::Gte => "gte",
            RangeOp::Lte => "lte",
            RangeOp::Gt => "gt",
            RangeOp::Lt => "lt",
        }
    }

    #[inline]
    pub fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            RangeOp::Gte => value >= bound,
            RangeOp::Lte => value <= bound,
            RangeOp::Gt => value > bound,
            RangeOp::Lt => value < bound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Range(RangeOp),
}

/// Split `mana_value__lte` into (`mana_value`, `Range(Lte)`).
/// Keys without a recognised suffix are plain equality on the whole key.
pub fn split_key(key: &str) -> (&str, Operator) {
    if let Some((field, suffix)) = key.rsplit_once("__") {
        if let Some(op) = RangeOp::from_suffix(suffix) {
            return (field, Operator::Range(op));
        }
    }
    (key, Operator::Eq)
}

/// A typed comparison value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn equals(&self, column: &Column<'_>) -> bool {
        match (self, column) {
            (Scalar::Text(v), Column::Text(s)) => v == s,
            (Scalar::Number(v), Column::Number(n)) => v == n,
            (Scalar::Bool(v), Column::Bool(b)) => v == b,
            _ => false,
        }
    }
}

/// A single validated condition over one attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact equality on a scalar column
    Equals { field: String, value: Scalar },
    /// Scalar column value is one of `values`
    In { field: String, values: Vec<Scalar> },
    /// Set column shares at least one element with `values`
    Overlaps { field: String, values: Vec<String> },
    /// Ordered comparison on a numeric column
    Range { field: String, op: RangeOp, bound: f64 },
    /// Matches nothing - produced by an explicit `null` filter value
    Never { field: String },
}

impl Predicate {
    pub fn field(&self) -> &str {
        match self {
            Predicate::Equals { field, .. }
            | Predicate::In { field, .. }
            | Predicate::Overlaps { field, .. }
            | Predicate::Range { field, .. }
            | Predicate::Never { field } => field,
        }
    }

    fn matches_column(&self, column: &Column<'_>) -> bool {
        match self {
            Predicate::Equals { value, .. } => value.equals(column),
            Predicate::In { values, .. } => values.iter().any(|v| v.equals(column)),
            Predicate::Overlaps { values, .. } => match column {
                Column::Set(items) => items
                    .iter()
                    .any(|item| values.iter().any(|v| v == item)),
                _ => false,
            },
            Predicate::Range { op, bound, .. } => match column {
                Column::Number(n) => op.holds(*n, *bound),
                _ => false,
            },
            Predicate::Never { .. } => false,
        }
    }
}

impl Filter for Predicate {
    fn matches(&self, card: &Card) -> bool {
        card.column(self.field())
            .map(|column| self.matches_column(&column))
            .unwrap_or(false)
    }
}

/// Conjunction: every predicate must hold
impl Filter for [Predicate] {
    fn matches(&self, card: &Card) -> bool {
        self.iter().all(|p| p.matches(card))
    }
}

/// Client-supplied filters: attribute name (optionally suffixed with a range
/// operator) to a scalar, a list, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(Map<String, Value>);

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for FilterSpec {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_error(key: &str, expected: &str, value: &Value) -> Error {
    Error::InvalidQuery(format!("filter '{key}' expects {expected}, got {value}"))
}

/// `3.0` becomes `"3"` so it compares equal to stored text like power "3"
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => n.to_string(),
    }
}

fn coerce(key: &str, kind: AttributeKind, value: &Value) -> Result<Scalar> {
    match kind {
        AttributeKind::Text | AttributeKind::Set => match value {
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            Value::Number(n) => Ok(Scalar::Text(number_text(n))),
            other => Err(type_error(key, "a string", other)),
        },
        AttributeKind::Number => match value {
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(Scalar::Number)
                .ok_or_else(|| type_error(key, "a number", value)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Scalar::Number)
                .ok_or_else(|| type_error(key, "a finite number", value)),
            other => Err(type_error(key, "a number", other)),
        },
        AttributeKind::Boolean => match value {
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            other => Err(type_error(key, "a boolean", other)),
        },
    }
}

fn coerce_list(key: &str, kind: AttributeKind, items: &[Value]) -> Result<Vec<Scalar>> {
    items
        .iter()
        .map(|item| match item {
            Value::Null => Err(Error::InvalidQuery(format!(
                "filter '{key}' contains null inside a list"
            ))),
            Value::Array(_) | Value::Object(_) => Err(type_error(key, "a flat list", item)),
            _ => coerce(key, kind, item),
        })
        .collect()
}

fn into_strings(values: Vec<Scalar>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Scalar::Text(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn compile_entry(
    key: &str,
    field: &str,
    op: Operator,
    kind: AttributeKind,
    value: &Value,
) -> Result<Predicate> {
    let field = field.to_string();

    if value.is_null() {
        return Ok(Predicate::Never { field });
    }

    match op {
        Operator::Range(op) => {
            if !kind.is_ordered() {
                return Err(Error::InvalidQuery(format!(
                    "range operator '{}' is not supported on '{field}'",
                    op.suffix()
                )));
            }
            if value.is_array() {
                return Err(type_error(key, "a single number", value));
            }
            match coerce(key, kind, value)? {
                Scalar::Number(bound) => Ok(Predicate::Range { field, op, bound }),
                _ => Err(type_error(key, "a number", value)),
            }
        }
        Operator::Eq => match value {
            Value::Array(items) => {
                let values = coerce_list(key, kind, items)?;
                if kind.is_set() {
                    Ok(Predicate::Overlaps { field, values: into_strings(values) })
                } else {
                    Ok(Predicate::In { field, values })
                }
            }
            Value::Object(_) => Err(type_error(key, "a scalar or a list", value)),
            _ => {
                let scalar = coerce(key, kind, value)?;
                if kind.is_set() {
                    Ok(Predicate::Overlaps { field, values: into_strings(vec![scalar]) })
                } else {
                    Ok(Predicate::Equals { field, value: scalar })
                }
            }
        },
    }
}

/// Compile a filter spec into a conjunction of predicates.
///
/// Every key is resolved first; if any key names an attribute outside the
/// schema the whole spec is rejected with [`Error::UnknownAttribute`] listing
/// all offending keys, and no predicate is produced.
pub fn compile(spec: &FilterSpec, schema: &AttributeSchema) -> Result<Vec<Predicate>> {
    let mut unknown = Vec::new();
    let mut resolved = Vec::with_capacity(spec.len());

    for (key, value) in spec.iter() {
        let (field, op) = split_key(key);
        match schema.get(field) {
            Some(kind) => resolved.push((key, field, op, kind, value)),
            None => unknown.push(key.clone()),
        }
    }

    if !unknown.is_empty() {
        unknown.sort();
        return Err(Error::UnknownAttribute(unknown));
    }

    resolved
        .into_iter()
        .map(|(key, field, op, kind, value)| compile_entry(key, field, op, kind, value))
        .collect()
}
