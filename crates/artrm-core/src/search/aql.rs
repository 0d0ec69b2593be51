//! Structured pattern → AQL translation.
//!
//! Grammar: `<repo>/<dir-pattern>/<name-pattern>`. The repository segment is
//! literal; the rest may use `*` and `?`, which AQL's `$match` understands.
//! A pattern ending in `/` (or naming only the repository) matches every name.

use serde_json::{Value, json};

use super::{FileSpec, QueryMode};
use crate::error::{Error, Result};

/// Fields requested for every structured search.
pub const DEFAULT_FIELDS: [&str; 6] = ["repo", "path", "name", "type", "size", "actual_sha1"];

/// Path value AQL uses for entries at the repository root.
pub const ROOT_PATH: &str = ".";

/// Build the query text for `spec`.
///
/// Literal queries are returned verbatim.
pub fn build_query(spec: &FileSpec) -> Result<String> {
    match spec.mode() {
        QueryMode::LiteralQuery => Ok(spec.text().to_string()),
        QueryMode::StructuredPattern => {
            let criteria = build_criteria(spec)?;
            Ok(format!(
                "items.find({}).include({})",
                criteria,
                include_clause(&DEFAULT_FIELDS)
            ))
        }
    }
}

/// The `items.find(...)` argument for a structured pattern.
pub fn build_criteria(spec: &FileSpec) -> Result<Value> {
    let pattern = spec.text().trim().trim_start_matches('/');
    let (repo, rest) = pattern.split_once('/').unwrap_or((pattern, ""));

    if repo.is_empty() {
        return Err(Error::invalid_spec(spec.text(), "missing repository name"));
    }
    if repo.contains(['*', '?']) {
        return Err(Error::invalid_spec(
            spec.text(),
            "wildcards are not supported in the repository name",
        ));
    }

    let (dir, name) = split_dir_and_name(rest.trim_start_matches('/'));
    if name.is_empty() {
        return Err(Error::invalid_spec(spec.text(), "empty file name pattern"));
    }

    let mut paths = vec![dir.to_string()];
    if spec.is_recursive() {
        paths.push(if dir == ROOT_PATH {
            "*".to_string()
        } else {
            format!("{dir}/*")
        });
    }

    let alternatives: Vec<Value> = paths
        .iter()
        .map(|path| {
            json!({
                "$and": [{
                    "path": { "$match": path },
                    "name": { "$match": name },
                }]
            })
        })
        .collect();

    let item_type = if spec.includes_directories() {
        "any"
    } else {
        "file"
    };

    Ok(json!({
        "repo": repo,
        "$or": alternatives,
        "type": item_type,
    }))
}

fn split_dir_and_name(rest: &str) -> (&str, &str) {
    if rest.is_empty() || rest.ends_with('/') {
        let dir = rest.trim_end_matches('/');
        return (if dir.is_empty() { ROOT_PATH } else { dir }, "*");
    }
    match rest.rsplit_once('/') {
        Some((dir, name)) if !dir.is_empty() => (dir, name),
        Some((_, name)) => (ROOT_PATH, name),
        None => (ROOT_PATH, rest),
    }
}

fn include_clause(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{field}\""))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria_of(query: &str) -> Value {
        let start = query.find("items.find(").unwrap() + "items.find(".len();
        let end = query.rfind(").include(").unwrap();
        serde_json::from_str(&query[start..end]).unwrap()
    }

    #[test]
    fn test_literal_query_is_verbatim() {
        let aql = r#"items.find({"repo":"libs"})"#;
        assert_eq!(build_query(&FileSpec::aql(aql)).unwrap(), aql);
    }

    #[test]
    fn test_recursive_pattern() {
        let query = build_query(&FileSpec::pattern("libs/org/acme/*.jar")).unwrap();
        assert_eq!(
            criteria_of(&query),
            json!({
                "repo": "libs",
                "$or": [
                    {"$and": [{"path": {"$match": "org/acme"}, "name": {"$match": "*.jar"}}]},
                    {"$and": [{"path": {"$match": "org/acme/*"}, "name": {"$match": "*.jar"}}]},
                ],
                "type": "file",
            })
        );
        assert!(query.ends_with(
            r#".include("repo","path","name","type","size","actual_sha1")"#
        ));
    }

    #[test]
    fn test_non_recursive_pattern() {
        let spec = FileSpec::pattern("libs/a/b.txt").with_recursive(false);
        let criteria = build_criteria(&spec).unwrap();
        assert_eq!(
            criteria["$or"],
            json!([{"$and": [{"path": {"$match": "a"}, "name": {"$match": "b.txt"}}]}])
        );
    }

    #[test]
    fn test_root_pattern() {
        let criteria = build_criteria(&FileSpec::pattern("libs/*.zip")).unwrap();
        assert_eq!(criteria["$or"][0]["$and"][0]["path"]["$match"], ".");
        assert_eq!(criteria["$or"][1]["$and"][0]["path"]["$match"], "*");
    }

    #[test]
    fn test_repository_only_matches_everything() {
        let criteria = build_criteria(&FileSpec::pattern("libs")).unwrap();
        assert_eq!(criteria["repo"], "libs");
        assert_eq!(criteria["$or"][0]["$and"][0]["path"]["$match"], ".");
        assert_eq!(criteria["$or"][0]["$and"][0]["name"]["$match"], "*");
    }

    #[test]
    fn test_trailing_slash_matches_directory_contents() {
        let criteria = build_criteria(&FileSpec::pattern("libs/a/b/")).unwrap();
        assert_eq!(criteria["$or"][0]["$and"][0]["path"]["$match"], "a/b");
        assert_eq!(criteria["$or"][0]["$and"][0]["name"]["$match"], "*");
        assert_eq!(criteria["$or"][1]["$and"][0]["path"]["$match"], "a/b/*");
    }

    #[test]
    fn test_include_directories_uses_any_type() {
        let spec = FileSpec::pattern("libs/a/*").with_include_directories(true);
        assert_eq!(build_criteria(&spec).unwrap()["type"], "any");
    }

    #[test]
    fn test_missing_repository_is_invalid() {
        let result = build_query(&FileSpec::pattern("/"));
        assert!(matches!(result, Err(Error::InvalidSpec { .. })));
    }

    #[test]
    fn test_wildcard_repository_is_invalid() {
        let result = build_query(&FileSpec::pattern("lib*/a.txt"));
        assert!(matches!(result, Err(Error::InvalidSpec { .. })));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let query = build_query(&FileSpec::pattern(r#"libs/a"b.txt"#)).unwrap();
        let criteria = criteria_of(&query);
        assert_eq!(criteria["$or"][0]["$and"][0]["name"]["$match"], r#"a"b.txt"#);
    }
}
