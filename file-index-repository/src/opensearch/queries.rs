//! OpenSearch query builders.
//!
//! Queries are assembled as JSON values rather than formatted strings, so
//! user-supplied identities and search text are always encoded as JSON
//! string values and cannot change the shape of the query.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Ids(Vec<String>),
    NameMatches(String),
    MatchAll,
}

/// A structured query against the file index.
///
/// # Example
///
/// ```ignore
/// let query = FileQuery::name_matches("report").from(20).size(10).build();
/// let page = reader.search(&query).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FileQuery {
    clause: Clause,
    from: Option<u64>,
    size: Option<u64>,
}

impl FileQuery {
    /// Match the document with exactly this identity.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::by_ids([id.into()])
    }

    /// Match documents whose identity is one of `ids`.
    pub fn by_ids(ids: impl IntoIterator<Item = String>) -> Self {
        Self::with_clause(Clause::Ids(ids.into_iter().collect()))
    }

    /// Full-text match on the display name.
    pub fn name_matches(text: impl Into<String>) -> Self {
        Self::with_clause(Clause::NameMatches(text.into()))
    }

    /// Match every document.
    pub fn match_all() -> Self {
        Self::with_clause(Clause::MatchAll)
    }

    fn with_clause(clause: Clause) -> Self {
        Self {
            clause,
            from: None,
            size: None,
        }
    }

    /// Skip the first `from` hits.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Return at most `size` hits.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Render the query in the OpenSearch query DSL.
    pub fn build(&self) -> Value {
        let query = match &self.clause {
            Clause::Ids(ids) => json!({ "ids": { "values": ids } }),
            Clause::NameMatches(text) => json!({
                "bool": {
                    "should": [
                        { "match": { "name": { "query": text } } },
                        {
                            // Prefix match on the n-gram subfields for partial names
                            "multi_match": {
                                "query": text,
                                "type": "bool_prefix",
                                "fields": ["name", "name._2gram", "name._3gram"]
                            }
                        }
                    ],
                    "minimum_should_match": 1
                }
            }),
            Clause::MatchAll => json!({ "match_all": {} }),
        };

        let mut body = Map::new();
        body.insert("query".to_string(), query);
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_query() {
        let query = FileQuery::by_id("5f1d7c").build();

        let values = query["query"]["ids"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "5f1d7c");
        assert!(query.get("from").is_none());
        assert!(query.get("size").is_none());
    }

    #[test]
    fn test_id_query_is_not_injectable() {
        let hostile = r#"x" ] } }, "size": 10000, "q": { "a": [ "y"#;
        let query = FileQuery::by_id(hostile).build();

        let values = query["query"]["ids"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], hostile);
        assert!(query.get("size").is_none());
        assert_eq!(query.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_build_name_query() {
        let query = FileQuery::name_matches("report").build();

        let should = query["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match"]["name"]["query"], "report");
        assert_eq!(should[1]["multi_match"]["type"], "bool_prefix");
        assert_eq!(query["query"]["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn test_pagination() {
        let query = FileQuery::match_all().from(20).size(10).build();

        assert!(query["query"]["match_all"].is_object());
        assert_eq!(query["from"], 20);
        assert_eq!(query["size"], 10);
    }

    #[test]
    fn test_build_multiple_ids() {
        let query = FileQuery::by_ids(vec!["a".to_string(), "b".to_string()]).build();

        let values = query["query"]["ids"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 2);
    }
}
