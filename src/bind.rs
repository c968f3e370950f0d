// Placeholder expansion and rebinding for compiled fragments

use crate::error::{QueryError, Result};
use crate::value::FilterValue;
use std::fmt::Write;

/// Placeholder syntax expected by the target driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` (SQLite, MySQL)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

/// Expand list arguments into one placeholder per item
///
/// `id IN (?)` with `[1, 2, 3]` becomes `id IN (?, ?, ?)` and the list is
/// flattened into the returned arguments. Scalar arguments are left alone.
/// Every `?` in the fragment is treated as a placeholder.
pub fn expand_lists(fragment: &str, args: &[FilterValue]) -> Result<(String, Vec<FilterValue>)> {
    let placeholders = fragment.matches('?').count();
    if placeholders != args.len() {
        return Err(QueryError::PlaceholderMismatch {
            placeholders,
            args: args.len(),
        });
    }

    let mut sql = String::with_capacity(fragment.len());
    let mut flat = Vec::with_capacity(args.len());
    let mut index = 0;

    for c in fragment.chars() {
        if c != '?' {
            sql.push(c);
            continue;
        }

        match &args[index] {
            FilterValue::List(items) if items.is_empty() => return Err(QueryError::EmptyList { index }),
            FilterValue::List(items) => {
                sql.push_str(&vec!["?"; items.len()].join(", "));
                flat.extend(items.iter().cloned());
            }
            scalar => {
                sql.push('?');
                flat.push(scalar.clone());
            }
        }
        index += 1;
    }

    Ok((sql, flat))
}

/// Rewrite `?` placeholders into the given style
pub fn rebind(fragment: &str, style: Placeholder) -> String {
    match style {
        Placeholder::Question => fragment.to_string(),
        Placeholder::Dollar => {
            let mut sql = String::with_capacity(fragment.len() + 8);
            let mut n = 0;
            for c in fragment.chars() {
                if c == '?' {
                    n += 1;
                    let _ = write!(sql, "${}", n);
                } else {
                    sql.push(c);
                }
            }
            sql
        }
    }
}
