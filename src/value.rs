// Filter values and the nil predicate

use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use serde::{Deserialize, Serialize};

/// Value bound to a filter key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum FilterValue {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::String(_) => "string",
            FilterValue::Int(_) => "int",
            FilterValue::Float(_) => "float",
            FilterValue::Bool(_) => "bool",
            FilterValue::Date(_) => "date",
            FilterValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Null => write!(f, "NULL"),
            FilterValue::String(s) => write!(f, "{}", s),
            FilterValue::Int(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilterValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<i32> for FilterValue {
    fn from(i: i32) -> Self {
        FilterValue::Int(i as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(x: f64) -> Self {
        FilterValue::Float(x)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

impl TryFrom<serde_json::Value> for FilterValue {
    type Error = crate::QueryError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(FilterValue::Null),
            Value::Bool(b) => Ok(FilterValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FilterValue::Int(i)),
                None => n
                    .as_f64()
                    .map(FilterValue::Float)
                    .ok_or_else(|| crate::QueryError::UnsupportedValue(n.to_string())),
            },
            Value::String(s) => Ok(FilterValue::String(s)),
            Value::Array(items) => items
                .into_iter()
                .map(FilterValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(FilterValue::List),
            Value::Object(_) => Err(crate::QueryError::UnsupportedValue(
                "objects cannot be used as filter values".to_string(),
            )),
        }
    }
}

impl From<FilterValue> for serde_json::Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Null => serde_json::Value::Null,
            FilterValue::String(s) => serde_json::Value::String(s),
            FilterValue::Int(i) => i.into(),
            FilterValue::Float(x) => serde_json::Number::from_f64(x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FilterValue::Bool(b) => b.into(),
            FilterValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            FilterValue::List(items) => serde_json::Value::Array(items.into_iter().map(Into::into).collect()),
        }
    }
}

// Lists must be flattened with `bind::expand_lists` before binding.
impl ToSql for FilterValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            FilterValue::Null => SqlValue::Null,
            FilterValue::String(s) => SqlValue::Text(s.clone()),
            FilterValue::Int(i) => SqlValue::Integer(*i),
            FilterValue::Float(x) => SqlValue::Real(*x),
            FilterValue::Bool(b) => SqlValue::Integer(*b as i64),
            FilterValue::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
            FilterValue::List(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                    crate::QueryError::UnsupportedValue("list must be expanded before binding".to_string()),
                )));
            }
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Decides whether a filter value counts as "not supplied"
pub trait NilPredicate {
    fn is_nil(&self, value: &FilterValue) -> bool;
}

impl<F> NilPredicate for F
where
    F: Fn(&FilterValue) -> bool,
{
    fn is_nil(&self, value: &FilterValue) -> bool {
        self(value)
    }
}

/// Null, empty strings and empty lists are nil; zero and false are values
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNilPredicate;

impl NilPredicate for DefaultNilPredicate {
    fn is_nil(&self, value: &FilterValue) -> bool {
        match value {
            FilterValue::Null => true,
            FilterValue::String(s) => s.is_empty(),
            FilterValue::List(items) => items.is_empty(),
            _ => false,
        }
    }
}
