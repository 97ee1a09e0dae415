//! Remote-store node types.

/// Node kind, the two variants a remote store distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular file
    File,
    /// Folder/directory
    Folder,
}

/// A node in the remote store's tree.
///
/// Nodes are snapshots: the store owns the tree, a `Node` only carries the
/// identifiers needed to talk to the store about it. The parent link is a
/// handle, never an owning reference, and is resolved through
/// [`RemoteStore::parent_of`](crate::vfs::RemoteStore::parent_of).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node name as shown in listings
    pub name: String,
    /// Store-issued opaque identifier
    pub handle: String,
    /// Handle of the containing folder (`None` for the root)
    pub parent_handle: Option<String>,
    /// Node kind
    pub kind: NodeKind,
    /// File size in bytes (0 for folders, advisory for files)
    pub size: u64,
}

impl Node {
    /// Build a file node.
    pub fn file(
        name: impl Into<String>,
        handle: impl Into<String>,
        parent_handle: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            parent_handle: Some(parent_handle.into()),
            kind: NodeKind::File,
            size,
        }
    }

    /// Build a folder node.
    pub fn folder(
        name: impl Into<String>,
        handle: impl Into<String>,
        parent_handle: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            parent_handle,
            kind: NodeKind::Folder,
            size: 0,
        }
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Check if this node is the store root.
    pub fn is_root(&self) -> bool {
        self.parent_handle.is_none()
    }
}

/// Render a byte count for listings (`512B`, `1.5KB`, ...).
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2}GB", bytes as f64 / 1_073_741_824.0)
    }
}
