//! Download side of the transfer pipeline.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::{DriveshError, Result};
use crate::progress::{ProgressCallback, TransferProgress};
use crate::vfs::{Node, RemoteStore};

/// Download a file node to a local path, overwriting whatever is there.
///
/// An existing destination is removed only once the source stream is
/// open; a failed open leaves it untouched. Chunks are appended in
/// stream order and the cumulative byte count is reported after each
/// one. Returns the final byte total. On failure mid-transfer the
/// destination may be left truncated; nothing is rolled back.
pub async fn download_to_path(
    store: &Arc<dyn RemoteStore>,
    node: &Node,
    dest: &Path,
    mut progress: Option<&mut ProgressCallback>,
) -> Result<u64> {
    if !node.is_file() {
        return Err(DriveshError::NotAFile(node.name.clone()));
    }

    let mut stream = store.read_stream(node).await?;

    // Overwrite, never append: the old destination is removed only once
    // the source stream is open. A failed removal aborts the download.
    match fs::remove_file(dest).await {
        Ok(()) => debug!(dest = %dest.display(), "removed existing destination"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut writer = BufWriter::new(fs::File::create(dest).await?);

    let mut done: u64 = 0;
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        if chunk.is_empty() {
            continue;
        }
        writer.write_all(&chunk).await?;
        done += chunk.len() as u64;

        if let Some(cb) = progress.as_deref_mut() {
            cb(&TransferProgress::new(done, node.size, &node.name));
        }
    }
    writer.flush().await?;

    debug!(file = %node.name, bytes = done, "download complete");
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemStore;
    use std::sync::Mutex;

    async fn store_with_file(content: Vec<u8>, chunk_size: usize) -> (Arc<dyn RemoteStore>, Node) {
        let store = MemStore::new().with_chunk_size(chunk_size);
        let root = store.root().await.unwrap();
        let node = store.put_file(&root, "data.bin", content).await.unwrap();
        (Arc::new(store), node)
    }

    fn recording_callback() -> (Arc<Mutex<Vec<u64>>>, ProgressCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ProgressCallback = Box::new(move |p: &TransferProgress| {
            sink.lock().unwrap().push(p.done);
        });
        (seen, cb)
    }

    #[tokio::test]
    async fn test_download_counter_climbs_to_exact_total() {
        let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let (store, node) = store_with_file(content.clone(), 1024).await;
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out.bin");

        let (seen, mut cb) = recording_callback();
        let total = download_to_path(&store, &node, &dest, Some(&mut cb))
            .await
            .unwrap();

        assert_eq!(total, 5000);
        assert_eq!(std::fs::read(&dest).unwrap(), content);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen.last().unwrap(), 5000);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_download_replaces_existing_destination() {
        let (store, node) = store_with_file(b"fresh".to_vec(), 2).await;
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out.bin");
        std::fs::write(&dest, b"stale content that is much longer").unwrap();

        let total = download_to_path(&store, &node, &dest, None).await.unwrap();

        assert_eq!(total, 5);
        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_failed_source_open_keeps_existing_destination() {
        let store: Arc<dyn RemoteStore> = Arc::new(MemStore::new());
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("keep.bin");
        std::fs::write(&dest, b"precious").unwrap();

        // file node the store has never issued
        let ghost = Node::file("gone.bin", "n404", "n0", 8);
        let err = download_to_path(&store, &ghost, &dest, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DriveshError::RemoteAccess(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"precious");
    }

    #[tokio::test]
    async fn test_download_zero_length_file() {
        let (store, node) = store_with_file(Vec::new(), 1024).await;
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("empty.bin");

        let (seen, mut cb) = recording_callback();
        let total = download_to_path(&store, &node, &dest, Some(&mut cb))
            .await
            .unwrap();

        assert_eq!(total, 0);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_rejects_folder_nodes() {
        let store = MemStore::new();
        let root = store.root().await.unwrap();
        let folder = store.make_folder(&root, "docs").await.unwrap();
        let store: Arc<dyn RemoteStore> = Arc::new(store);
        let tmp = tempfile::tempdir().unwrap();

        let err = download_to_path(&store, &folder, &tmp.path().join("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DriveshError::NotAFile(_)));
    }
}
