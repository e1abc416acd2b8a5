//! Label generation, attachment and merging.

mod generator;
mod merger;
mod pipeline;
mod updater;

use std::path::Path;

use common::{DocumentError, StorageError};
use thiserror::Error;
use tokio::task::JoinError;
use uuid::Uuid;

pub use generator::{LabelGenerator, LabelHandle};
pub use merger::{DocumentMerger, MergeError, MergedDocument};
pub use pipeline::{LabelOutcome, LabelPipeline};
pub use updater::LabelUpdater;

const LABEL_PREFIX: &str = "label-";

/// Artifact name of the label for shipment `id`.
pub fn label_file_name(id: Uuid) -> String {
    format!("{LABEL_PREFIX}{id}.pdf")
}

/// Whether `name` looks like a per-shipment label artifact.
pub fn is_label_file_name(name: &str) -> bool {
    name.starts_with(LABEL_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("label rendering failed: {0}")]
    Render(#[from] DocumentError),

    #[error("label write failed: {0}")]
    Storage(#[from] StorageError),

    #[error("label task failed: {0}")]
    Task(#[from] JoinError),
}
