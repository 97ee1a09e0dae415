//! The capability interface every remote store backend implements.

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use tokio::io::AsyncRead;

use crate::error::Result;
use crate::vfs::Node;

/// Chunked byte stream handed out by [`RemoteStore::read_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Abstract reader consumed by [`RemoteStore::write_stream`].
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// Operations a remote file store exposes to the browser.
///
/// Implementations are shared behind `Arc<dyn RemoteStore>` so transfer
/// tasks can hold onto the store across an `await`. All methods take
/// `&self`; interior mutability is the implementation's business.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Root folder of the store.
    async fn root(&self) -> Result<Node>;

    /// Children of a folder, in the store's listing order.
    ///
    /// Fails with [`DriveshError::NotAFolder`](crate::error::DriveshError::NotAFolder)
    /// when `folder` is a file.
    async fn list_folder(&self, folder: &Node) -> Result<Vec<Node>>;

    /// Containing folder of `node`. The root is its own parent.
    async fn parent_of(&self, node: &Node) -> Result<Node>;

    /// Create an empty file named `name` inside `folder` and return it.
    async fn create_file(&self, folder: &Node, name: &str) -> Result<Node>;

    /// Open `file` for reading as a chunked byte stream.
    async fn read_stream(&self, file: &Node) -> Result<ByteStream>;

    /// Replace the contents of `file` with everything `source` yields.
    ///
    /// Returns the number of bytes written. The store drains `source` to
    /// EOF; the caller decides how bytes arrive on the other end.
    async fn write_stream(&self, file: &Node, source: ByteSource) -> Result<u64>;
}
