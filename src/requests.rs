// Batch input: queries from JSONL or YAML files

use crate::query::Query;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Read queries from a file
///
/// `.yaml`/`.yml` files hold a sequence of queries. Anything else is read as
/// JSONL, one query object per line.
pub fn read_queries(path: &Path) -> Result<Vec<Query>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => read_yaml(path),
        _ => read_jsonl(path),
    }
}

fn read_yaml(path: &Path) -> Result<Vec<Query>> {
    let file = File::open(path).context("Failed to open YAML file")?;
    let queries: Vec<Query> = serde_yaml::from_reader(file).context("Failed to parse YAML queries")?;
    info!(file = ?path, count = queries.len(), "Loaded queries");
    Ok(queries)
}

/// Malformed lines are logged and skipped
fn read_jsonl(path: &Path) -> Result<Vec<Query>> {
    let file = File::open(path).context("Failed to open JSONL file")?;
    let reader = BufReader::new(file);
    let mut queries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Query>(&line) {
            Ok(query) => queries.push(query),
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = %e,
                    "Failed to parse query, skipping"
                );
            }
        }
    }

    info!(file = ?path, count = queries.len(), "Loaded queries");
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FilterValue;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_jsonl_skips_bad_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queries.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"sort": "name", "filter": {"status$eq": 1}}"#,
                "\n\n",
                "not json\n",
                r#"{"filter": {"id$in": [1, 2]}}"#,
                "\n",
            ),
        )
        .unwrap();

        let queries = read_queries(&path).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].sort, "name");
        assert_eq!(queries[0].filter()["status$eq"], FilterValue::Int(1));
        assert_eq!(queries[1].filter()["id$in"], FilterValue::from(vec![1, 2]));
    }

    #[test]
    fn test_read_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("queries.yaml");
        fs::write(
            &path,
            r#"
- sort: "-created_at"
  filter:
    created_at$gte: "2024-01-05"
    name$like: bob
- filter:
    deleted_at$eq!: null
"#,
        )
        .unwrap();

        let queries = read_queries(&path).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].order(), "created_at DESC");

        let (sql, args) = queries[1].where_clause().unwrap();
        assert_eq!(sql, "deleted_at = ?");
        assert_eq!(args, vec![FilterValue::Null]);
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(read_queries(&temp.path().join("missing.jsonl")).is_err());
    }
}
