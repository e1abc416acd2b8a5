pub mod document;
pub mod storage;

pub use document::{DocumentError, LabelContent};
pub use storage::{LabelStore, StorageError};
