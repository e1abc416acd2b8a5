use std::sync::Arc;

use common::document::{self, DocumentError};
use common::storage::{LabelStore, StorageError};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{info, instrument};

use super::{is_label_file_name, label_file_name};
use crate::config::MergeSelection;
use crate::store::{ShipmentStore, StoreError};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no label documents to merge")]
    NoDocuments,

    #[error("label {name} could not be read: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("merge failed: {0}")]
    Document(#[from] DocumentError),

    #[error("merged document could not be written: {0}")]
    Storage(#[from] StorageError),

    #[error("shipment lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("merge task failed: {0}")]
    Task(#[from] JoinError),
}

/// Result of a successful merge.
#[derive(Debug)]
pub struct MergedDocument {
    /// Artifact name the merged document was written under.
    pub name: String,
    /// Source artifacts, in page order.
    pub sources: Vec<String>,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Combines the most recent labels into a single downloadable document.
pub struct DocumentMerger {
    labels: Arc<dyn LabelStore>,
    store: Arc<dyn ShipmentStore>,
    selection: MergeSelection,
    output_name: String,
}

impl DocumentMerger {
    pub fn new(
        labels: Arc<dyn LabelStore>,
        store: Arc<dyn ShipmentStore>,
        selection: MergeSelection,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            labels,
            store,
            selection,
            output_name: output_name.into(),
        }
    }

    /// Merge the `n` most recent labels, oldest first, and overwrite the
    /// merged artifact with the result.
    ///
    /// All-or-nothing: any unreadable or corrupt source aborts the merge and
    /// leaves the previous merged artifact untouched.
    #[instrument(skip(self), fields(selection = ?self.selection))]
    pub async fn merge_recent(&self, n: usize) -> Result<MergedDocument, MergeError> {
        let names = self.select(n).await?;
        if names.is_empty() {
            return Err(MergeError::NoDocuments);
        }

        let mut sources = Vec::with_capacity(names.len());
        for name in &names {
            let bytes = self
                .labels
                .get(name)
                .await
                .map_err(|source| MergeError::Unreadable {
                    name: name.clone(),
                    source,
                })?;
            sources.push(bytes);
        }

        let (bytes, page_count) = tokio::task::spawn_blocking(move || {
            let bytes = document::merge_documents(&sources)?;
            let page_count = document::page_count(&bytes)?;
            Ok::<_, DocumentError>((bytes, page_count))
        })
        .await??;
        self.labels.put(&self.output_name, &bytes).await?;

        info!(
            count = names.len(),
            page_count,
            artifact = %self.output_name,
            "Merged recent labels"
        );

        Ok(MergedDocument {
            name: self.output_name.clone(),
            sources: names,
            page_count,
            bytes,
        })
    }

    /// Names of the labels to merge, oldest first.
    async fn select(&self, n: usize) -> Result<Vec<String>, MergeError> {
        match self.selection {
            MergeSelection::Filename => {
                let mut names: Vec<String> = self
                    .labels
                    .list()
                    .await?
                    .into_iter()
                    .filter(|name| is_label_file_name(name))
                    .collect();
                names.sort();
                let skip = names.len().saturating_sub(n);
                Ok(names.split_off(skip))
            }
            MergeSelection::Records => {
                let shipments = self.store.list_recent_labeled(n as u64).await?;
                Ok(shipments
                    .iter()
                    .rev()
                    .map(|shipment| label_file_name(shipment.id))
                    .collect())
            }
        }
    }
}
