//! [`RemoteStore`] backend over a local directory tree.
//!
//! Handles are the path relative to the base directory, `""` for the root.
//! That keeps them stable across listings without holding file descriptors
//! open, at the cost of racing against outside modification like any other
//! path-based tool.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{DriveshError, Result};
use crate::vfs::store::{ByteSource, ByteStream, RemoteStore};
use crate::vfs::{Node, NodeKind};

/// Store rooted at a directory on the local filesystem.
pub struct DirStore {
    base: PathBuf,
    root_name: String,
    chunk_size: usize,
}

impl DirStore {
    /// Open `base` as a store. Fails when `base` is not a directory.
    pub async fn open(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let meta = fs::metadata(&base)
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("open {}: {e}", base.display())))?;
        if !meta.is_dir() {
            return Err(DriveshError::NotAFolder(base.display().to_string()));
        }
        let root_name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "/".to_string());
        Ok(Self {
            base,
            root_name,
            chunk_size: crate::transfer::DEFAULT_CHUNK_SIZE,
        })
    }

    /// Set the chunk size [`read_stream`](RemoteStore::read_stream) uses.
    /// Zero falls back to the default.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = crate::transfer::effective_chunk_size(chunk_size);
        self
    }

    fn abs_path(&self, handle: &str) -> PathBuf {
        if handle.is_empty() {
            self.base.clone()
        } else {
            self.base.join(handle)
        }
    }

    fn child_handle(parent_handle: &str, name: &str) -> String {
        if parent_handle.is_empty() {
            name.to_string()
        } else {
            format!("{parent_handle}/{name}")
        }
    }

    fn root_node(&self) -> Node {
        Node::folder(self.root_name.clone(), String::new(), None)
    }

    fn expect_file(&self, node: &Node) -> Result<PathBuf> {
        if node.kind != NodeKind::File {
            return Err(DriveshError::NotAFile(node.name.clone()));
        }
        Ok(self.abs_path(&node.handle))
    }
}

#[async_trait::async_trait]
impl RemoteStore for DirStore {
    async fn root(&self) -> Result<Node> {
        Ok(self.root_node())
    }

    async fn list_folder(&self, folder: &Node) -> Result<Vec<Node>> {
        if folder.kind != NodeKind::Folder {
            return Err(DriveshError::NotAFolder(folder.name.clone()));
        }
        let path = self.abs_path(&folder.handle);
        let mut dir = fs::read_dir(&path)
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("list {}: {e}", path.display())))?;

        let mut children = Vec::new();
        while let Some(dent) = dir
            .next_entry()
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("list {}: {e}", path.display())))?
        {
            let name = dent.file_name().to_string_lossy().into_owned();
            let meta = dent
                .metadata()
                .await
                .map_err(|e| DriveshError::RemoteAccess(format!("stat {name}: {e}")))?;
            let handle = Self::child_handle(&folder.handle, &name);
            let node = if meta.is_dir() {
                Node::folder(name, handle, Some(folder.handle.clone()))
            } else {
                Node::file(name, handle, folder.handle.clone(), meta.len())
            };
            children.push(node);
        }
        // folders first, then alphabetical
        children.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(children)
    }

    async fn parent_of(&self, node: &Node) -> Result<Node> {
        let parent_handle = match &node.parent_handle {
            None => return Ok(self.root_node()),
            Some(h) if h.is_empty() => return Ok(self.root_node()),
            Some(h) => h.clone(),
        };
        let node = match parent_handle.rsplit_once('/') {
            Some((grandparent, name)) => Node::folder(
                name.to_string(),
                parent_handle.clone(),
                Some(grandparent.to_string()),
            ),
            None => Node::folder(
                parent_handle.clone(),
                parent_handle.clone(),
                Some(String::new()),
            ),
        };
        Ok(node)
    }

    async fn create_file(&self, folder: &Node, name: &str) -> Result<Node> {
        if folder.kind != NodeKind::Folder {
            return Err(DriveshError::NotAFolder(folder.name.clone()));
        }
        // Handles are base-relative paths; a separator or dot component
        // in a name would address outside the folder it names.
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(DriveshError::RemoteAccess(format!(
                "invalid file name: {name:?}"
            )));
        }
        let handle = Self::child_handle(&folder.handle, name);
        let path = self.abs_path(&handle);
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("create {}: {e}", path.display())))?;
        debug!(path = %path.display(), "created file");
        Ok(Node::file(name, handle, folder.handle.clone(), 0))
    }

    async fn read_stream(&self, file: &Node) -> Result<ByteStream> {
        let path = self.expect_file(file)?;
        let handle = fs::File::open(&path)
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("open {}: {e}", path.display())))?;
        Ok(Box::pin(ReaderStream::with_capacity(handle, self.chunk_size)))
    }

    async fn write_stream(&self, file: &Node, mut source: ByteSource) -> Result<u64> {
        let path = self.expect_file(file)?;
        let mut dest = fs::File::create(&path)
            .await
            .map_err(|e| DriveshError::RemoteAccess(format!("create {}: {e}", path.display())))?;
        let written = tokio::io::copy(&mut source, &mut dest).await?;
        dest.sync_all().await?;
        debug!(path = %path.display(), bytes = written, "wrote file content");
        Ok(written)
    }
}
