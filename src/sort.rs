// Sort specification compiler

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

/// One `column DIRECTION` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub column: String,
    pub direction: SortDirection,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// Parse `name,-age` into sort fields; a leading `-` means descending
///
/// Tokens are not trimmed and empty tokens are kept.
pub fn parse_sort(spec: &str) -> Vec<SortField> {
    if spec.is_empty() {
        return Vec::new();
    }

    spec.split(',')
        .map(|token| match token.strip_prefix('-') {
            Some(column) => SortField {
                column: column.to_string(),
                direction: SortDirection::Desc,
            },
            None => SortField {
                column: token.to_string(),
                direction: SortDirection::Asc,
            },
        })
        .collect()
}

/// Compile a sort spec into an `ORDER BY` body (without the keyword)
pub fn compile_order(spec: &str) -> String {
    parse_sort(spec)
        .iter()
        .map(SortField::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
