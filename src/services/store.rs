//! Document store seam.
//!
//! The application only reads: one document by id, or every document in a
//! collection. `FirestoreStore` implements this over REST; tests use an
//! in-memory map.

use std::collections::BTreeMap;

/// Field value as seen by the application. Anything that is not text, a
/// list of text, or null collapses to `Unsupported` and is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Text(String),
    List(Vec<String>),
    Unsupported,
}

/// A raw document: its id within the collection plus its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), fields: BTreeMap::new() }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.to_owned(), FieldValue::Text(value.into()));
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),
    #[error("store returned status {status}: {body}")]
    Response { status: u16, body: String },
    #[error("store response parse failed: {0}")]
    Parse(String),
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `Ok(None)` when it does not exist.
    ///
    /// `bearer` is the caller's ID token, forwarded so store-side access
    /// rules apply to the signed-in user.
    async fn get_document(&self, collection: &str, id: &str, bearer: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch every document in a collection, unfiltered and unsorted.
    async fn list_documents(&self, collection: &str, bearer: &str) -> Result<Vec<Document>, StoreError>;
}
