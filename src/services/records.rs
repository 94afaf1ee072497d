//! Record fetcher: reads contribution documents and shapes them.
//!
//! Store failures are logged and read as "no data": the dashboard shows the
//! same empty state for a missing record and for a failed fetch.

use tracing::{error, info};

use super::store::DocumentStore;
use crate::record::ContributionRecord;

pub struct RecordFetcher<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> RecordFetcher<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// The record whose document id is `email`, if any.
    pub async fn fetch_record(&self, email: &str, bearer: &str) -> Option<ContributionRecord> {
        match self
            .store
            .get_document(self.collection, email, bearer)
            .await
        {
            Ok(Some(doc)) => Some(ContributionRecord::from_document(&doc)),
            Ok(None) => {
                info!(collection = self.collection, "no contribution record for user");
                None
            }
            Err(e) => {
                error!(error = %e, collection = self.collection, "fetching contribution record failed");
                None
            }
        }
    }

    /// Every record in the collection, in store order.
    pub async fn list_records(&self, bearer: &str) -> Vec<ContributionRecord> {
        match self.store.list_documents(self.collection, bearer).await {
            Ok(docs) => docs.iter().map(ContributionRecord::from_document).collect(),
            Err(e) => {
                error!(error = %e, collection = self.collection, "listing contribution records failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
