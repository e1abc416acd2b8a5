use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Flat, name-keyed artifact storage.
///
/// Writing an existing name replaces it. Readers only ever observe fully
/// written artifacts: a name becomes visible to `list`/`get` once its write
/// has completed.
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// Store bytes under `name`, replacing any previous artifact.
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes of an artifact.
    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(name).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve an artifact as a streaming async reader.
    async fn get_stream(&self, name: &str) -> Result<BoxReader, StorageError>;

    /// Names of all finalized artifacts, in no particular order.
    async fn list(&self) -> Result<Vec<String>, StorageError>;
}
