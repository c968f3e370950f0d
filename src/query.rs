// Filter/sort container and the WHERE compiler

use crate::error::Result;
use crate::filter::{Clause, CompileOptions, Filter, FilterKey};
use crate::sort::compile_order;
use crate::value::{DefaultNilPredicate, FilterValue, NilPredicate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter and sort parameters for a single request
///
/// Filter keys have the form `column$operator[!]`, e.g.
///
/// ```text
/// "amount$gte": 19200.00
/// "status$eq":  1
/// ```
///
/// which compiles to `amount >= ? AND status = ?`. Keys are compiled in
/// sorted order so the fragment and argument order are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub filter: Filter,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sort spec, e.g. `name,-age`
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Add or replace a single filter
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Replace all filters
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Get the current filters
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Compile filters into a `WHERE` body and its bind arguments
    ///
    /// Uses lenient typing and [`DefaultNilPredicate`].
    pub fn where_clause(&self) -> Result<(String, Vec<FilterValue>)> {
        self.where_clause_with(&CompileOptions::default(), &DefaultNilPredicate)
    }

    /// Compile filters with explicit options and nil predicate
    ///
    /// Optional filters whose value is nil contribute `1 = 1` and no argument.
    pub fn where_clause_with<P: NilPredicate + ?Sized>(
        &self,
        options: &CompileOptions,
        nil: &P,
    ) -> Result<(String, Vec<FilterValue>)> {
        let mut wheres = Vec::with_capacity(self.filter.len());
        let mut args = Vec::with_capacity(self.filter.len());

        for (raw_key, value) in &self.filter {
            let key = FilterKey::parse(raw_key)?;

            let clause = if key.required || !nil.is_nil(value) {
                Clause::build(&key, value, options)?
            } else {
                Clause::tautology()
            };

            debug!(key = raw_key.as_str(), sql = clause.sql.as_str(), "Compiled clause");

            wheres.push(clause.sql);
            args.extend(clause.arg);
        }

        Ok((wheres.join(" AND "), args))
    }

    /// Compile the sort spec into an `ORDER BY` body
    pub fn order(&self) -> String {
        compile_order(&self.sort)
    }
}
