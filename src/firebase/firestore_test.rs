use super::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/v1/projects/demo/databases/(default)/documents/contribution";

fn store(server: &MockServer) -> FirestoreStore {
    FirestoreStore::new(reqwest::Client::new(), &server.uri(), "demo".into(), "test-key".into())
}

fn raw_doc(id: &str, patents: &str) -> Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/contribution/{id}"),
        "fields": { "patents": { "stringValue": patents } },
        "createTime": "2024-03-01T10:00:00.000000Z",
        "updateTime": "2024-03-01T10:00:00.000000Z"
    })
}

// =============================================================================
// decode_value
// =============================================================================

#[test]
fn decode_string_and_null() {
    assert_eq!(decode_value(&json!({ "stringValue": "x" })), FieldValue::Text("x".into()));
    assert_eq!(decode_value(&json!({ "nullValue": null })), FieldValue::Null);
}

#[test]
fn decode_scalars_as_text() {
    assert_eq!(decode_value(&json!({ "integerValue": "42" })), FieldValue::Text("42".into()));
    assert_eq!(decode_value(&json!({ "booleanValue": true })), FieldValue::Text("true".into()));
    assert_eq!(decode_value(&json!({ "doubleValue": 1.5 })), FieldValue::Text("1.5".into()));
}

#[test]
fn decode_arrays_keep_scalar_items() {
    let value = json!({ "arrayValue": { "values": [
        { "stringValue": "a" },
        { "mapValue": { "fields": {} } },
        { "integerValue": "7" }
    ] } });
    assert_eq!(decode_value(&value), FieldValue::List(vec!["a".into(), "7".into()]));
}

#[test]
fn decode_empty_array() {
    assert_eq!(decode_value(&json!({ "arrayValue": {} })), FieldValue::List(Vec::new()));
}

#[test]
fn decode_unsupported_shapes() {
    assert_eq!(decode_value(&json!({ "mapValue": { "fields": {} } })), FieldValue::Unsupported);
    assert_eq!(decode_value(&json!("bare")), FieldValue::Unsupported);
}

#[test]
fn parse_document_takes_id_from_name() {
    let doc = parse_document(&raw_doc("ada@uni.edu", "P1").to_string()).unwrap();
    assert_eq!(doc.id, "ada@uni.edu");
    assert_eq!(doc.fields.get("patents"), Some(&FieldValue::Text("P1".into())));
}

#[test]
fn parse_document_without_fields() {
    let doc = parse_document(r#"{"name":"projects/demo/databases/(default)/documents/contribution/empty@uni.edu"}"#)
        .unwrap();
    assert_eq!(doc.id, "empty@uni.edu");
    assert!(doc.fields.is_empty());
}

#[test]
fn parse_empty_list_page() {
    let page = parse_list_page("{}").unwrap();
    assert!(page.documents.is_empty());
    assert!(page.next_page_token.is_none());
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn get_document_sends_key_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_PATH}/ada@uni.edu")))
        .and(query_param("key", "test-key"))
        .and(header("authorization", "Bearer id-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(raw_doc("ada@uni.edu", "P1\nP2")))
        .expect(1)
        .mount(&server)
        .await;

    let doc = store(&server)
        .get_document("contribution", "ada@uni.edu", "id-token")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.id, "ada@uni.edu");
    assert_eq!(doc.fields.get("patents"), Some(&FieldValue::Text("P1\nP2".into())));
}

#[tokio::test]
async fn get_document_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS_PATH}/ghost@uni.edu")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let doc = store(&server)
        .get_document("contribution", "ghost@uni.edu", "id-token")
        .await
        .unwrap();
    assert!(doc.is_none());
}

#[tokio::test]
async fn get_document_permission_denied_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let err = store(&server)
        .get_document("contribution", "ada@uni.edu", "id-token")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Response { status: 403, .. }));
}

#[tokio::test]
async fn list_documents_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [raw_doc("c@uni.edu", "C")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [raw_doc("a@uni.edu", "A"), raw_doc("b@uni.edu", "B")],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = store(&server)
        .list_documents("contribution", "id-token")
        .await
        .unwrap();
    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["a@uni.edu", "b@uni.edu", "c@uni.edu"]);
}

#[tokio::test]
async fn list_documents_stops_on_repeated_page_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [raw_doc("a@uni.edu", "A")],
            "nextPageToken": "stuck"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let docs = store(&server)
        .list_documents("contribution", "id-token")
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
}

#[tokio::test]
async fn list_documents_stops_on_page_token_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [raw_doc("b@uni.edu", "B")],
            "nextPageToken": "page-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [raw_doc("a@uni.edu", "A")],
            "nextPageToken": "page-2"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let docs = store(&server)
        .list_documents("contribution", "id-token")
        .await
        .unwrap();
    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["a@uni.edu", "b@uni.edu", "a@uni.edu"]);
}

#[tokio::test]
async fn list_documents_empty_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let docs = store(&server)
        .list_documents("contribution", "")
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn list_documents_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = store(&server)
        .list_documents("contribution", "id-token")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Response { status: 500, ref body } if body == "boom"));
}
