//! Cloud Firestore REST client (read-only).
//!
//! Requests carry the caller's ID token as a bearer token so the project's
//! security rules decide what each user may read. Listing follows
//! `nextPageToken` until the collection is exhausted; callers get the whole
//! collection in one `Vec`. A token the server already handed out ends the
//! listing.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::services::store::{Document, DocumentStore, FieldValue, StoreError};

const PAGE_SIZE: &str = "300";

// =============================================================================
// CLIENT
// =============================================================================

pub struct FirestoreStore {
    http: reqwest::Client,
    base: String,
    project_id: String,
    api_key: String,
}

impl FirestoreStore {
    #[must_use]
    pub fn new(http: reqwest::Client, base: &str, project_id: String, api_key: String) -> Self {
        Self { http, base: base.trim_end_matches('/').to_owned(), project_id, api_key }
    }

    fn documents_url(&self, segments: &[&str]) -> Result<reqwest::Url, StoreError> {
        let mut url = reqwest::Url::parse(&self.base).map_err(|e| StoreError::Request(format!("{}: {e}", self.base)))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::Request(format!("{} cannot be a base url", self.base)))?
            .pop_if_empty()
            .extend(["v1", "projects", self.project_id.as_str(), "databases", "(default)", "documents"])
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: reqwest::Url, bearer: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url).query(&[("key", self.api_key.as_str())]);
        if bearer.is_empty() { request } else { request.bearer_auth(bearer) }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_document(&self, collection: &str, id: &str, bearer: &str) -> Result<Option<Document>, StoreError> {
        let url = self.documents_url(&[collection, id])?;
        let response = self
            .get(url, bearer)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        match status {
            200 => parse_document(&body).map(Some),
            404 => Ok(None),
            _ => Err(StoreError::Response { status, body }),
        }
    }

    async fn list_documents(&self, collection: &str, bearer: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let url = self.documents_url(&[collection])?;
            let mut request = self
                .get(url, bearer)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Request(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| StoreError::Request(e.to_string()))?;
            if status != 200 {
                return Err(StoreError::Response { status, body });
            }

            let page = parse_list_page(&body)?;
            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    warn!(collection, %token, "page token repeated; stopping listing");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

pub(crate) struct ListPage {
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_document(body: &str) -> Result<Document, StoreError> {
    let raw: RawDocument = serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok(convert(raw))
}

pub(crate) fn parse_list_page(body: &str) -> Result<ListPage, StoreError> {
    let raw: RawListResponse = serde_json::from_str(body).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok(ListPage {
        documents: raw.documents.into_iter().map(convert).collect(),
        next_page_token: raw.next_page_token.filter(|t| !t.is_empty()),
    })
}

fn convert(raw: RawDocument) -> Document {
    let id = raw.name.rsplit('/').next().unwrap_or_default().to_owned();
    let fields = raw
        .fields
        .iter()
        .map(|(name, value)| (name.clone(), decode_value(value)))
        .collect();
    Document { id, fields }
}

/// Decode one Firestore typed value (`{"stringValue": ...}` and friends).
pub(crate) fn decode_value(value: &Value) -> FieldValue {
    let Some(typed) = value.as_object() else {
        return FieldValue::Unsupported;
    };
    if typed.contains_key("nullValue") {
        return FieldValue::Null;
    }
    if let Some(array) = typed.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(scalar_text).collect())
            .unwrap_or_default();
        return FieldValue::List(items);
    }
    scalar_text(value).map_or(FieldValue::Unsupported, FieldValue::Text)
}

fn scalar_text(value: &Value) -> Option<String> {
    let typed = value.as_object()?;
    if let Some(text) = typed.get("stringValue").and_then(Value::as_str) {
        return Some(text.to_owned());
    }
    // Firestore sends 64-bit integers as JSON strings.
    if let Some(int) = typed.get("integerValue") {
        return int.as_str().map(str::to_owned).or_else(|| int.as_i64().map(|i| i.to_string()));
    }
    if let Some(double) = typed.get("doubleValue").and_then(Value::as_f64) {
        return Some(double.to_string());
    }
    if let Some(flag) = typed.get("booleanValue").and_then(Value::as_bool) {
        return Some(flag.to_string());
    }
    typed
        .get("timestampValue")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "firestore_test.rs"]
mod tests;
