//! PDF label rendering and merging.

mod label;
mod merge;

use thiserror::Error;

pub use label::{LabelContent, render_label};
pub use merge::{merge_documents, page_count};

/// PDF version written by this module.
const PDF_VERSION: &str = "1.5";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no source documents to merge")]
    Empty,

    #[error("source document {index} could not be parsed: {source}")]
    Parse {
        index: usize,
        #[source]
        source: lopdf::Error,
    },

    #[error("source document {index} has no pages")]
    NoPages { index: usize },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}
