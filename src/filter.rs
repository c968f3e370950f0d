// Filter key grammar and per-operator clause shaping

use crate::error::{QueryError, Result};
use crate::operator::{Operator, translate_operator};
use crate::value::FilterValue;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Filter mapping keyed by `column$operator[!]`, iterated in key order
pub type Filter = BTreeMap<String, FilterValue>;

/// Clause emitted for an omitted optional filter
pub const TAUTOLOGY: &str = "1 = 1";

static DATE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex"));

/// Parsed form of a filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    /// Column name, used verbatim
    pub column: String,
    /// Resolved comparison operator
    pub operator: Operator,
    /// Trailing `!`: emit the clause even when the value is nil
    pub required: bool,
}

impl FilterKey {
    /// Parse `column$operator[!]`
    ///
    /// Unknown or empty operator tokens resolve to `eq`. Keys without a `$`
    /// are rejected.
    pub fn parse(key: &str) -> Result<Self> {
        let mut fields = key.split('$');
        let column = fields.next().unwrap_or_default();
        let token = fields.next().ok_or_else(|| QueryError::InvalidFilterKey { key: key.to_string() })?;

        let required = token.ends_with('!');
        let operator = translate_operator(token.strip_suffix('!').unwrap_or(token));

        Ok(Self {
            column: column.to_string(),
            operator,
            required,
        })
    }

    /// Render the key back into its canonical `column$token[!]` form
    pub fn to_key(&self) -> String {
        format!(
            "{}${}{}",
            self.column,
            self.operator.token(),
            if self.required { "!" } else { "" }
        )
    }
}

/// Options controlling how clauses are compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail with `InvalidOperandType` instead of degrading mismatched operands
    pub strict_types: bool,
    /// Reject column names outside `[A-Za-z0-9_.]`
    pub validate_columns: bool,
}

impl CompileOptions {
    pub fn strict() -> Self {
        Self {
            strict_types: true,
            validate_columns: true,
        }
    }
}

/// One compiled clause and the argument it binds, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub arg: Option<FilterValue>,
}

impl Clause {
    pub fn tautology() -> Self {
        Self {
            sql: TAUTOLOGY.to_string(),
            arg: None,
        }
    }

    /// Shape the clause for a parsed key and its value
    pub fn build(key: &FilterKey, value: &FilterValue, options: &CompileOptions) -> Result<Self> {
        if options.validate_columns {
            validate_column_name(&key.column)?;
        }

        let op = key.operator;
        let placeholder = if op.takes_tuple() { "(?)" } else { "?" };
        let sql = format!("{} {} {}", key.column, op.to_sql(), placeholder);

        let arg = match op {
            Operator::Like => {
                let body = match value {
                    FilterValue::String(s) => s.clone(),
                    FilterValue::Date(_) => value.to_string(),
                    other => {
                        if options.strict_types {
                            return Err(mismatch(key, other));
                        }
                        String::new()
                    }
                };
                FilterValue::String(format!("%{}%", body))
            }
            Operator::Gte => expand_date(key, value, "00:00:00", options)?,
            Operator::Lte => expand_date(key, value, "23:59:59", options)?,
            _ => value.clone(),
        };

        Ok(Self { sql, arg: Some(arg) })
    }
}

/// Widen a bare `YYYY-MM-DD` value to a day boundary; anything else passes through
fn expand_date(key: &FilterKey, value: &FilterValue, boundary: &str, options: &CompileOptions) -> Result<FilterValue> {
    match value {
        FilterValue::String(s) if DATE_ONLY.is_match(s) => Ok(FilterValue::String(format!("{} {}", s, boundary))),
        FilterValue::Date(_) => Ok(FilterValue::String(format!("{} {}", value, boundary))),
        FilterValue::List(_) if options.strict_types => Err(mismatch(key, value)),
        other => Ok(other.clone()),
    }
}

fn mismatch(key: &FilterKey, value: &FilterValue) -> QueryError {
    QueryError::InvalidOperandType {
        column: key.column.clone(),
        operator: key.operator.to_sql(),
        found: value.type_name(),
    }
}

fn validate_column_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');

    if !valid {
        return Err(QueryError::InvalidColumnName {
            column: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(key: &str, value: FilterValue) -> Clause {
        Clause::build(&FilterKey::parse(key).unwrap(), &value, &CompileOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_key() {
        let key = FilterKey::parse("amount$gte").unwrap();
        assert_eq!(key.column, "amount");
        assert_eq!(key.operator, Operator::Gte);
        assert!(!key.required);

        let key = FilterKey::parse("status$EQ!").unwrap();
        assert_eq!(key.operator, Operator::Eq);
        assert!(key.required);
    }

    #[test]
    fn test_parse_key_defaults_to_eq() {
        assert_eq!(FilterKey::parse("col$xyz").unwrap().operator, Operator::Eq);
        assert_eq!(FilterKey::parse("col$").unwrap().operator, Operator::Eq);

        let key = FilterKey::parse("col$!").unwrap();
        assert_eq!(key.operator, Operator::Eq);
        assert!(key.required);
    }

    #[test]
    fn test_parse_key_without_separator() {
        let err = FilterKey::parse("status").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidFilterKey {
                key: "status".to_string()
            }
        );
    }

    #[test]
    fn test_parse_key_ignores_extra_segments() {
        let key = FilterKey::parse("a$lt$gt").unwrap();
        assert_eq!(key.column, "a");
        assert_eq!(key.operator, Operator::Lt);
    }

    #[test]
    fn test_to_key() {
        assert_eq!(FilterKey::parse("name$LIKE!").unwrap().to_key(), "name$like!");
        assert_eq!(FilterKey::parse("id$zzz").unwrap().to_key(), "id$eq");
    }

    #[test]
    fn test_like_wraps_string() {
        let clause = build("name$like", FilterValue::from("abc"));
        assert_eq!(clause.sql, "name LIKE ?");
        assert_eq!(clause.arg, Some(FilterValue::from("%abc%")));
    }

    #[test]
    fn test_like_non_string_degrades() {
        let clause = build("name$like", FilterValue::Int(5));
        assert_eq!(clause.arg, Some(FilterValue::from("%%")));
    }

    #[test]
    fn test_like_non_string_strict() {
        let key = FilterKey::parse("name$like").unwrap();
        let options = CompileOptions {
            strict_types: true,
            ..Default::default()
        };
        let err = Clause::build(&key, &FilterValue::Int(5), &options).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidOperandType {
                column: "name".to_string(),
                operator: "LIKE",
                found: "int",
            }
        );
    }

    #[test]
    fn test_date_boundaries() {
        let gte = build("created$gte", FilterValue::from("2024-01-05"));
        assert_eq!(gte.sql, "created >= ?");
        assert_eq!(gte.arg, Some(FilterValue::from("2024-01-05 00:00:00")));

        let lte = build("created$lte", FilterValue::from("2024-01-05"));
        assert_eq!(lte.sql, "created <= ?");
        assert_eq!(lte.arg, Some(FilterValue::from("2024-01-05 23:59:59")));
    }

    #[test]
    fn test_date_boundaries_from_date_value() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let lte = build("created$lte", FilterValue::Date(date));
        assert_eq!(lte.arg, Some(FilterValue::from("2024-02-29 23:59:59")));
    }

    #[test]
    fn test_non_date_passes_through() {
        assert_eq!(build("n$gte", FilterValue::from("5")).arg, Some(FilterValue::from("5")));
        assert_eq!(build("n$lte", FilterValue::from("5")).arg, Some(FilterValue::from("5")));
        assert_eq!(build("n$gte", FilterValue::Float(19200.0)).arg, Some(FilterValue::Float(19200.0)));
        assert_eq!(
            build("t$gte", FilterValue::from("2024-01-05 10:00:00")).arg,
            Some(FilterValue::from("2024-01-05 10:00:00"))
        );
    }

    #[test]
    fn test_tuple_operators() {
        let clause = build("id$in", FilterValue::from(vec![1, 2, 3]));
        assert_eq!(clause.sql, "id IN (?)");
        assert_eq!(clause.arg, Some(FilterValue::from(vec![1, 2, 3])));

        let clause = build("id$or", FilterValue::from(vec![1, 2]));
        assert_eq!(clause.sql, "id OR (?)");
        assert_eq!(clause.arg, Some(FilterValue::from(vec![1, 2])));
    }

    #[test]
    fn test_validate_columns() {
        let options = CompileOptions::strict();
        let ok = FilterKey::parse("users.name$eq").unwrap();
        assert!(Clause::build(&ok, &FilterValue::from("x"), &options).is_ok());

        let bad = FilterKey::parse("name; DROP TABLE users$eq").unwrap();
        assert!(matches!(
            Clause::build(&bad, &FilterValue::from("x"), &options),
            Err(QueryError::InvalidColumnName { .. })
        ));
    }
}
