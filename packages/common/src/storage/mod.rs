mod error;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemLabelStore;
pub use traits::{BoxReader, LabelStore};
