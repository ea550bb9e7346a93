//! Tests for the docstore client endpoints

use super::*;
use crate::models::{
    AuxSchema, Filter, Namespace, NewNode, NodeUpdate, PropertyType, Schema, SchemaProperty,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn node_json(id: &str) -> serde_json::Value {
    json!({ "id": id, "name": format!("node-{id}"), "parent_id": "root" })
}

fn page_json(page: u32, ids: &[&str]) -> serde_json::Value {
    let results: Vec<_> = ids.iter().map(|id| node_json(id)).collect();
    json!({
        "result_count": results.len(),
        "search_result_total": 42,
        "page": page,
        "results": results
    })
}

async fn client_for(server: &MockServer) -> DocClient {
    DocClient::new(&server.uri()).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_endpoint_encodes_segments() {
    let client = DocClient::new("https://docs.example.com/api/").unwrap();

    assert_eq!(
        client.endpoint(&["nodes", "a/b c"]).unwrap(),
        "https://docs.example.com/api/nodes/a%2Fb%20c"
    );
    assert_eq!(
        client.endpoint(&["search", "oql"]).unwrap(),
        "https://docs.example.com/api/search/oql"
    );
}

#[test]
fn test_rejects_non_base_url() {
    assert!(DocClient::new("mailto:someone@example.com").is_err());
    assert!(matches!(
        DocClient::new("file:///var/docs"),
        Err(crate::error::Error::InvalidConfigValue { .. })
    ));
    assert!(matches!(
        DocClient::new("not a url"),
        Err(crate::error::Error::InvalidUrl(_))
    ));
}

#[test]
fn test_page_size_setting() {
    let client = DocClient::new("https://docs.example.com").unwrap();
    assert_eq!(client.page_size(), None);
    assert_eq!(client.with_page_size(25).page_size(), Some(25));
}

// ============================================================================
// Nodes
// ============================================================================

#[tokio::test]
async fn test_get_node() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nodes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json("n1")))
        .mount(&server)
        .await;

    let node = client_for(&server).await.get_node("n1").await.unwrap();
    assert_eq!(node.id, "n1");
    assert_eq!(node.name, "node-n1");
}

#[tokio::test]
async fn test_get_missing_node_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nodes/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "no such node"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_node("ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("no such node"));
}

#[tokio::test]
async fn test_get_node_by_path_and_children() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nodes"))
        .and(query_param("path", "/projects/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json("alpha")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nodes/alpha/children"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([node_json("c1"), node_json("c2")])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let node = client.get_node_by_path("/projects/alpha").await.unwrap();
    let children = client.get_children(&node.id).await.unwrap();

    assert_eq!(
        children.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["c1", "c2"]
    );
}

#[tokio::test]
async fn test_create_update_move_delete_node() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nodes"))
        .and(body_json(json!({
            "name": "report",
            "parent_id": "root",
            "schema": "document",
            "properties": {"dc:title": "Q3"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(node_json("n9")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/nodes/n9"))
        .and(body_json(json!({"properties": {"dc:title": "Q4"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json("n9")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/nodes/n9/move"))
        .and(body_json(json!({"parent_id": "archive"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json("n9")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/nodes/n9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let created = client
        .create_node(
            &NewNode::new("report")
                .parent("root")
                .schema("document")
                .property("dc:title", "Q3"),
        )
        .await
        .unwrap();
    client
        .update_node(&created.id, &NodeUpdate::new().property("dc:title", "Q4"))
        .await
        .unwrap();
    client.move_node(&created.id, "archive").await.unwrap();
    client.delete_node(&created.id).await.unwrap();
}

// ============================================================================
// Namespaces and schemas
// ============================================================================

#[tokio::test]
async fn test_namespaces() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/namespaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"prefix": "dc", "uri": "http://purl.org/dc/elements/1.1/"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/namespaces/dc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"prefix": "dc", "uri": "http://purl.org/dc/elements/1.1/"}
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/namespaces"))
        .and(body_json(json!({"prefix": "ex", "uri": "urn:example"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"prefix": "ex", "uri": "urn:example"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/namespaces/ex"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let all = client.list_namespaces().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(client.get_namespace("dc").await.unwrap(), all[0]);

    let created = client
        .create_namespace(&Namespace::new("ex", "urn:example"))
        .await
        .unwrap();
    assert_eq!(created.prefix, "ex");
    client.delete_namespace("ex").await.unwrap();
}

#[tokio::test]
async fn test_schemas_and_aux_schemas_use_separate_roots() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/schemas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "document", "properties": []}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auxschemas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "dc:titled"}, {"name": "dc:versioned"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/schemas/document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "document",
            "properties": [{"name": "dc:title", "type": "string", "required": true}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auxschemas"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "ex:tagged"})))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/auxschemas/ex:tagged"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    assert_eq!(client.list_schemas().await.unwrap().len(), 1);
    assert_eq!(client.list_aux_schemas().await.unwrap().len(), 2);

    let updated = client
        .update_schema(
            "document",
            &Schema::new("document")
                .with_property(SchemaProperty::new("dc:title", PropertyType::String).required()),
        )
        .await
        .unwrap();
    assert!(updated.properties[0].required);

    let aux = client
        .create_aux_schema(&AuxSchema::new("ex:tagged"))
        .await
        .unwrap();
    client.delete_aux_schema(&aux.name).await.unwrap();
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_single_page_query_sends_page_and_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({
            "query": {"schema": "document"},
            "page": 3,
            "page_size": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(3, &["a"])))
        .mount(&server)
        .await;

    let client = client_for(&server).await.with_page_size(10);
    let page = client
        .query(&Filter::eq("schema", "document"), 3)
        .await
        .unwrap();

    assert_eq!(page.page, 3);
    assert_eq!(page.search_result_total, 42);
    assert_eq!(page.results[0].id, "a");
}

#[tokio::test]
async fn test_query_all_walks_pages_until_empty() {
    let server = MockServer::start().await;
    let filter = json!({"schema": "document"});

    for (page, ids) in [(1, vec!["a", "b"]), (2, vec!["c"]), (3, vec![])] {
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": filter, "page": page})))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(page, &ids)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let result = client_for(&server)
        .await
        .query_all(&Filter::new(filter.clone()))
        .await
        .unwrap();

    assert_eq!(
        result.results.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
    assert_eq!(result.result_count, 3);
    assert_eq!(result.search_result_total, 3);
}

#[tokio::test]
async fn test_oql_query_all_stops_on_error() {
    let server = MockServer::start().await;
    let oql = "SELECT * FROM document WHERE dc:title LIKE 'Q%'";

    Mock::given(method("POST"))
        .and(path("/search/oql"))
        .and(body_json(json!({"query": oql, "page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(1, &["a"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search/oql"))
        .and(body_json(json!({"query": oql, "page": 2})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "syntax error near LIKE",
            "code": "OQL_PARSE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .oql_query_all(oql)
        .await
        .unwrap_err();

    match err {
        crate::error::Error::Api {
            status,
            message,
            code,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "syntax error near LIKE");
            assert_eq!(code.as_deref(), Some("OQL_PARSE"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_on_later_page_is_not_requested_again() {
    let server = MockServer::start().await;
    let filter = json!({"schema": "document"});

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": filter, "page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(1, &["a"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": filter, "page": 2})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "index offline"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .query_all(&Filter::new(filter))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Server error 500: index offline");
}

#[tokio::test]
async fn test_create_is_sent_once_on_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/nodes/n-1/move"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let err = client.create_node(&NewNode::new("report")).await.unwrap_err();
    assert_eq!(err.status(), Some(502));

    let err = client.move_node("n-1", "archive").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}
