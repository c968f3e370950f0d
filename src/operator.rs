// Operator vocabulary for filter keys

use std::str::FromStr;

/// Comparison operators addressable from a filter key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Gt,   // >
    Lt,   // <
    Eq,   // =
    Ne,   // !=
    Gte,  // >=
    Lte,  // <=
    Like, // LIKE %value%
    In,   // IN (?)
    Or,   // OR (?)
}

/// Token to operator table, fixed for the life of the process
pub const OPERATORS: [(&str, Operator); 9] = [
    ("gt", Operator::Gt),
    ("lt", Operator::Lt),
    ("eq", Operator::Eq),
    ("ne", Operator::Ne),
    ("gte", Operator::Gte),
    ("lte", Operator::Lte),
    ("like", Operator::Like),
    ("in", Operator::In),
    ("or", Operator::Or),
];

impl Operator {
    pub fn to_sql(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::Or => "OR",
        }
    }

    /// Short token used in filter keys
    pub fn token(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(token, _)| *token)
            .unwrap_or("eq")
    }

    /// Exact match against the lowercase token table
    pub fn from_token(token: &str) -> Option<Self> {
        OPERATORS.iter().find(|(t, _)| *t == token).map(|(_, op)| *op)
    }

    /// Whether the operator binds a whole tuple to a single `(?)` placeholder
    pub fn takes_tuple(self) -> bool {
        matches!(self, Operator::In | Operator::Or)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

impl FromStr for Operator {
    type Err = std::convert::Infallible;

    /// Never fails: unknown tokens resolve to `Eq`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(translate_operator(s))
    }
}

/// SQL text for a lowercase token, or an empty string if the token is unknown
pub fn lookup(token: &str) -> &'static str {
    Operator::from_token(token).map(Operator::to_sql).unwrap_or("")
}

/// Resolve a raw token case-insensitively, defaulting to equality
pub fn translate_operator(token: &str) -> Operator {
    match Operator::from_token(&token.to_lowercase()) {
        Some(op) => op,
        None => {
            if !token.is_empty() {
                tracing::debug!(token, "Unknown operator token, defaulting to eq");
            }
            Operator::Eq
        }
    }
}
