//! # drivesh
//!
//! Interactive command-line browser for hierarchical remote file stores.
//!
//! ## Features
//!
//! - **Navigation**: index-based folder browsing with a single current
//!   position per session (`cd <index>`, `0` for the parent folder).
//! - **File creation**: `mkfile <name>` in the current folder.
//! - **Transfers**:
//!   - Chunked download to a local path with overwrite semantics.
//!   - Chunked upload through a bounded producer/consumer conduit, so the
//!     store's reader-based write API gets backpressure for free.
//!   - Live cumulative byte progress with custom callbacks.
//! - **Backends**: any store behind the [`RemoteStore`] trait; an
//!   in-memory store and a local-directory store ship in the box.
//!
//! Index commands resolve against the listing the session printed last,
//! so what the user saw is what an index means, even if the store has
//! changed since.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use drivesh::{MemStore, Repl};
//!
//! # async fn example() -> drivesh::Result<()> {
//! let store = Arc::new(MemStore::new());
//!
//! // Prompt loop runs until end-of-input
//! let mut repl = Repl::new(store).await?;
//! repl.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Driving a Store Directly
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use drivesh::transfer::download_to_path;
//! use drivesh::{DirStore, RemoteStore};
//!
//! # async fn example() -> drivesh::Result<()> {
//! let store: Arc<dyn RemoteStore> = Arc::new(DirStore::open("/srv/share").await?);
//!
//! let root = store.root().await?;
//! let mut entries = store.list_folder(&root).await?;
//! for node in &entries {
//!     println!("{} ({} bytes)", node.name, node.size);
//! }
//!
//! let file = entries.remove(0);
//! download_to_path(&store, &file, Path::new("out.bin"), None).await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
pub mod nav;
pub mod progress;
pub mod repl;
pub mod transfer;
pub mod vfs;

// Re-export commonly used types
pub use command::Command;
pub use error::{DriveshError, Result};
pub use progress::{ProgressCallback, TransferProgress};
pub use repl::Repl;
pub use vfs::{DirStore, MemStore, Node, NodeKind, RemoteStore};
