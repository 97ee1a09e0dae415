//! In-memory [`RemoteStore`] backend.
//!
//! Backs the demo session and most of the test suite. The whole tree lives
//! in a `HashMap` behind a [`tokio::sync::RwLock`]; nothing is held across
//! an `await`, streams operate on snapshots taken under the lock.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DriveshError, Result};
use crate::vfs::store::{ByteSource, ByteStream, RemoteStore};
use crate::vfs::{Node, NodeKind};

struct Entry {
    node: Node,
    content: Vec<u8>,
    /// Child handles in insertion order; listings replay this order.
    children: Vec<String>,
}

struct StoreInner {
    entries: HashMap<String, Entry>,
    root_handle: String,
    next_id: u64,
}

impl StoreInner {
    fn new() -> Self {
        let root = Node::folder("/", "n0", None);
        let root_handle = root.handle.clone();
        let mut entries = HashMap::new();
        entries.insert(
            root_handle.clone(),
            Entry {
                node: root,
                content: Vec::new(),
                children: Vec::new(),
            },
        );
        Self {
            entries,
            root_handle,
            next_id: 1,
        }
    }

    fn mint_handle(&mut self) -> String {
        let handle = format!("n{}", self.next_id);
        self.next_id += 1;
        handle
    }

    fn entry(&self, handle: &str) -> Result<&Entry> {
        self.entries
            .get(handle)
            .ok_or_else(|| DriveshError::RemoteAccess(format!("unknown handle: {handle}")))
    }

    fn entry_mut(&mut self, handle: &str) -> Result<&mut Entry> {
        self.entries
            .get_mut(handle)
            .ok_or_else(|| DriveshError::RemoteAccess(format!("unknown handle: {handle}")))
    }

    fn insert_child(&mut self, parent: &Node, node: Node, content: Vec<u8>) -> Result<Node> {
        let parent_entry = self.entry(&parent.handle)?;
        if parent_entry.node.kind != NodeKind::Folder {
            return Err(DriveshError::NotAFolder(parent.name.clone()));
        }
        for handle in &parent_entry.children {
            if self.entry(handle)?.node.name == node.name {
                return Err(DriveshError::RemoteAccess(format!(
                    "'{}' already exists in '{}'",
                    node.name, parent.name
                )));
            }
        }
        let handle = node.handle.clone();
        self.entries.insert(
            handle.clone(),
            Entry {
                node: node.clone(),
                content,
                children: Vec::new(),
            },
        );
        self.entry_mut(&parent.handle)?.children.push(handle);
        Ok(node)
    }
}

/// In-memory store with a configurable read chunk size.
pub struct MemStore {
    inner: Arc<RwLock<StoreInner>>,
    chunk_size: usize,
}

impl MemStore {
    /// Create an empty store holding only the root folder.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::new())),
            chunk_size: crate::transfer::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size [`read_stream`](RemoteStore::read_stream) slices
    /// content into. Zero falls back to the default.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = crate::transfer::effective_chunk_size(chunk_size);
        self
    }

    /// Seed a folder under `parent`.
    pub async fn make_folder(&self, parent: &Node, name: &str) -> Result<Node> {
        let mut inner = self.inner.write().await;
        let handle = inner.mint_handle();
        let node = Node::folder(name, handle, Some(parent.handle.clone()));
        inner.insert_child(parent, node, Vec::new())
    }

    /// Seed a file with content under `parent`.
    pub async fn put_file(
        &self,
        parent: &Node,
        name: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<Node> {
        let content = content.into();
        let mut inner = self.inner.write().await;
        let handle = inner.mint_handle();
        let node = Node::file(name, handle, parent.handle.clone(), content.len() as u64);
        inner.insert_child(parent, node, content)
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemStore {
    async fn root(&self) -> Result<Node> {
        let inner = self.inner.read().await;
        let root_handle = inner.root_handle.clone();
        Ok(inner.entry(&root_handle)?.node.clone())
    }

    async fn list_folder(&self, folder: &Node) -> Result<Vec<Node>> {
        let inner = self.inner.read().await;
        let entry = inner.entry(&folder.handle)?;
        if entry.node.kind != NodeKind::Folder {
            return Err(DriveshError::NotAFolder(folder.name.clone()));
        }
        let mut children = Vec::with_capacity(entry.children.len());
        for handle in &entry.children {
            children.push(inner.entry(handle)?.node.clone());
        }
        Ok(children)
    }

    async fn parent_of(&self, node: &Node) -> Result<Node> {
        let inner = self.inner.read().await;
        match &node.parent_handle {
            Some(parent) => Ok(inner.entry(parent)?.node.clone()),
            // the root is its own parent
            None => {
                let root_handle = inner.root_handle.clone();
                Ok(inner.entry(&root_handle)?.node.clone())
            }
        }
    }

    async fn create_file(&self, folder: &Node, name: &str) -> Result<Node> {
        let mut inner = self.inner.write().await;
        let handle = inner.mint_handle();
        let node = Node::file(name, handle, folder.handle.clone(), 0);
        let created = inner.insert_child(folder, node, Vec::new())?;
        debug!(name = %created.name, handle = %created.handle, "created file");
        Ok(created)
    }

    async fn read_stream(&self, file: &Node) -> Result<ByteStream> {
        let content = {
            let inner = self.inner.read().await;
            let entry = inner.entry(&file.handle)?;
            if entry.node.kind != NodeKind::File {
                return Err(DriveshError::NotAFile(file.name.clone()));
            }
            entry.content.clone()
        };
        let chunk_size = self.chunk_size;
        let chunks: Vec<std::io::Result<Bytes>> = content
            .chunks(chunk_size)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn write_stream(&self, file: &Node, mut source: ByteSource) -> Result<u64> {
        {
            let inner = self.inner.read().await;
            let entry = inner.entry(&file.handle)?;
            if entry.node.kind != NodeKind::File {
                return Err(DriveshError::NotAFile(file.name.clone()));
            }
        }
        let mut buf = Vec::new();
        source.read_to_end(&mut buf).await?;
        let written = buf.len() as u64;

        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(&file.handle)?;
        entry.node.size = written;
        entry.content = buf;
        debug!(name = %file.name, bytes = written, "stored file content");
        Ok(written)
    }
}
