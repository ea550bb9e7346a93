//! Search request and result shapes

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Structured filter: a nested key-value predicate tree.
///
/// Plain keys match property values, `$and` / `$or` combine sub-filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(JsonValue);

impl Filter {
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Match nodes whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let mut map = JsonObject::new();
        map.insert(field.into(), value.into());
        Self(JsonValue::Object(map))
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::combine("$and", filters)
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::combine("$or", filters)
    }

    fn combine(op: &str, filters: impl IntoIterator<Item = Filter>) -> Self {
        let list = filters.into_iter().map(|f| f.0).collect();
        let mut map = JsonObject::new();
        map.insert(op.to_string(), JsonValue::Array(list));
        Self(JsonValue::Object(map))
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }
}

impl From<JsonValue> for Filter {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Body of a single-page search request, for either query dialect
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a, Q: Serialize + ?Sized> {
    pub query: &'a Q,
    /// 1-based page number
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    #[serde(default)]
    pub result_count: u64,
    /// Total matches reported by the server
    #[serde(default)]
    pub search_result_total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Page with counts derived from `results`
    pub fn new(page: u32, results: Vec<T>) -> Self {
        let count = results.len() as u64;
        Self {
            result_count: count,
            search_result_total: count,
            page,
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Results of every page of a query, concatenated in page order.
///
/// Both counts equal the number of accumulated items; there is no page number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult<T> {
    pub result_count: u64,
    pub search_result_total: u64,
    pub results: Vec<T>,
}

impl<T> AggregatedResult<T> {
    pub(crate) fn from_results(results: Vec<T>) -> Self {
        let count = results.len() as u64;
        Self {
            result_count: count,
            search_result_total: count,
            results,
        }
    }
}

impl<T> Default for AggregatedResult<T> {
    fn default() -> Self {
        Self::from_results(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_builders() {
        let filter = Filter::and([
            Filter::eq("schema", "document"),
            Filter::or([Filter::eq("dc:creator", "ana"), Filter::eq("dc:creator", "bo")]),
        ]);

        assert_eq!(
            filter.as_value(),
            &json!({
                "$and": [
                    {"schema": "document"},
                    {"$or": [{"dc:creator": "ana"}, {"dc:creator": "bo"}]}
                ]
            })
        );
    }

    #[test]
    fn test_filter_is_transparent() {
        let filter = Filter::new(json!({"name": "report"}));
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"{"name":"report"}"#);
    }

    #[test]
    fn test_search_request_body() {
        let filter = Filter::eq("name", "a");
        let body = serde_json::to_value(SearchRequest {
            query: &filter,
            page: 2,
            page_size: None,
        })
        .unwrap();
        assert_eq!(body, json!({"query": {"name": "a"}, "page": 2}));

        let body = serde_json::to_value(SearchRequest {
            query: "SELECT * FROM document",
            page: 1,
            page_size: Some(50),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"query": "SELECT * FROM document", "page": 1, "page_size": 50})
        );
    }

    #[test]
    fn test_page_deserialize() {
        let page: Page<JsonValue> = serde_json::from_value(json!({
            "result_count": 2,
            "search_result_total": 10,
            "page": 1,
            "results": [{"id": "a"}, {"id": "b"}]
        }))
        .unwrap();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.search_result_total, 10);
        assert!(!page.is_empty());

        let empty: Page<JsonValue> = serde_json::from_value(json!({"page": 4})).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.result_count, 0);
    }

    #[test]
    fn test_aggregated_result_has_no_page_field() {
        let agg = AggregatedResult::from_results(vec![1, 2, 3]);
        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(
            value,
            json!({"result_count": 3, "search_result_total": 3, "results": [1, 2, 3]})
        );
    }
}
