// sqlfilter - Compile query-string filters and sort specs into SQL fragments

pub mod bind;
pub mod error;
pub mod filter;
pub mod operator;
pub mod query;
pub mod requests;
pub mod sort;
pub mod value;

// Re-export main types for convenience
pub use bind::{Placeholder, expand_lists, rebind};
pub use error::QueryError;
pub use filter::{Clause, CompileOptions, Filter, FilterKey};
pub use operator::{Operator, lookup, translate_operator};
pub use query::Query;
pub use sort::{SortDirection, SortField, compile_order, parse_sort};
pub use value::{DefaultNilPredicate, FilterValue, NilPredicate};
