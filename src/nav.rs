//! Folder-position state machine.
//!
//! A [`Navigator`] owns the session's current folder and the listing that
//! was last fetched for it. Index-based commands always resolve against
//! that cached listing, so an index means exactly the entry the user saw,
//! even if the store has changed since.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DriveshError, Result};
use crate::vfs::{Node, RemoteStore};

/// Map a 1-based listing index to its entry.
///
/// Index 0 is not a listing entry; callers route it to parent navigation
/// before calling this.
pub fn resolve(listing: &[Node], index: usize) -> Result<&Node> {
    if index == 0 || index > listing.len() {
        return Err(DriveshError::IndexOutOfRange {
            index,
            len: listing.len(),
        });
    }
    Ok(&listing[index - 1])
}

/// Session navigation state: current folder plus its last listing.
pub struct Navigator {
    store: Arc<dyn RemoteStore>,
    current: Node,
    listing: Vec<Node>,
}

impl Navigator {
    /// Start a session at the store's root.
    pub async fn new(store: Arc<dyn RemoteStore>) -> Result<Self> {
        let current = store.root().await?;
        Ok(Self {
            store,
            current,
            listing: Vec::new(),
        })
    }

    /// The folder the session is currently in.
    pub fn current(&self) -> &Node {
        &self.current
    }

    /// The store this navigator browses.
    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    /// The listing fetched by the last successful [`list_current`](Self::list_current).
    pub fn listing(&self) -> &[Node] {
        &self.listing
    }

    /// Fetch and cache the children of the current folder.
    ///
    /// On failure the cached listing is emptied, so stale indices cannot
    /// leak into later commands.
    pub async fn list_current(&mut self) -> Result<&[Node]> {
        self.listing.clear();
        self.listing = self.store.list_folder(&self.current).await?;
        Ok(&self.listing)
    }

    /// Resolve an index against the cached listing.
    pub fn entry(&self, index: usize) -> Result<&Node> {
        resolve(&self.listing, index)
    }

    /// Make the folder at `index` the current folder.
    pub fn enter(&mut self, index: usize) -> Result<()> {
        let node = self.entry(index)?.clone();
        if !node.is_folder() {
            return Err(DriveshError::NotAFolder(node.name));
        }
        debug!(folder = %node.name, "entering folder");
        self.current = node;
        self.listing.clear();
        Ok(())
    }

    /// Move to the parent of the current folder. At the root this is a
    /// no-op, the root being its own parent.
    pub async fn go_to_parent(&mut self) -> Result<()> {
        let parent = self.store.parent_of(&self.current).await?;
        debug!(folder = %parent.name, "moving to parent");
        self.current = parent;
        self.listing.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemStore;

    fn sample_listing() -> Vec<Node> {
        vec![
            Node::folder("docs", "h1", Some("root".into())),
            Node::file("a.txt", "h2", "root", 3),
        ]
    }

    #[test]
    fn test_resolve_accepts_exactly_one_through_len() {
        let listing = sample_listing();
        assert_eq!(resolve(&listing, 1).unwrap().name, "docs");
        assert_eq!(resolve(&listing, 2).unwrap().name, "a.txt");
        for bad in [0usize, 3, 100] {
            let err = resolve(&listing, bad).unwrap_err();
            match err {
                DriveshError::IndexOutOfRange { index, len } => {
                    assert_eq!(index, bad);
                    assert_eq!(len, 2);
                }
                other => panic!("expected IndexOutOfRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_resolve_empty_listing_always_fails() {
        assert!(resolve(&[], 1).is_err());
    }

    async fn seeded_navigator() -> Navigator {
        let store = MemStore::new();
        let root = store.root().await.unwrap();
        let docs = store.make_folder(&root, "docs").await.unwrap();
        store.put_file(&root, "a.txt", b"abc".to_vec()).await.unwrap();
        store.put_file(&docs, "inner.txt", b"x".to_vec()).await.unwrap();
        Navigator::new(Arc::new(store)).await.unwrap()
    }

    #[tokio::test]
    async fn test_enter_and_return_reproduces_listing() {
        let mut nav = seeded_navigator().await;

        let names: Vec<String> = nav
            .list_current()
            .await
            .unwrap()
            .iter()
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(names, vec!["docs", "a.txt"]);

        nav.enter(1).unwrap();
        assert_eq!(nav.current().name, "docs");
        let inner: Vec<String> = nav
            .list_current()
            .await
            .unwrap()
            .iter()
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(inner, vec!["inner.txt"]);

        nav.go_to_parent().await.unwrap();
        let again: Vec<String> = nav
            .list_current()
            .await
            .unwrap()
            .iter()
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(again, names);
    }

    #[tokio::test]
    async fn test_enter_file_is_rejected_and_position_kept() {
        let mut nav = seeded_navigator().await;
        nav.list_current().await.unwrap();

        let err = nav.enter(2).unwrap_err();
        assert!(matches!(err, DriveshError::NotAFolder(_)));
        assert!(nav.current().is_root());
        // listing survives a failed enter, indices still usable
        assert_eq!(nav.entry(2).unwrap().name, "a.txt");
    }

    #[tokio::test]
    async fn test_parent_at_root_stays_at_root() {
        let mut nav = seeded_navigator().await;
        nav.list_current().await.unwrap();
        nav.go_to_parent().await.unwrap();
        assert!(nav.current().is_root());
        assert_eq!(nav.list_current().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_enter_clears_cached_listing() {
        let mut nav = seeded_navigator().await;
        nav.list_current().await.unwrap();
        nav.enter(1).unwrap();
        assert!(matches!(
            nav.entry(1).unwrap_err(),
            DriveshError::IndexOutOfRange { len: 0, .. }
        ));
    }
}
