//! Virtual filesystem layer: the node model, the [`RemoteStore`]
//! capability trait, and the bundled backends.

mod localdir;
mod memory;
mod node;
pub mod store;

pub use localdir::DirStore;
pub use memory::MemStore;
pub use node::{format_size, Node, NodeKind};
pub use store::{ByteSource, ByteStream, RemoteStore};
