//! Upload side of the transfer pipeline.
//!
//! The store's write API consumes a reader, so chunks cannot be pushed at
//! it directly. Upload instead runs two tasks for the duration of the
//! call: a producer reading local chunks into a bounded conduit, and a
//! consumer draining the conduit into the store's write stream. The bound
//! gives backpressure; a full conduit blocks the producer until the store
//! catches up.

use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::io::StreamReader;
use tracing::debug;

use super::{effective_chunk_size, CONDUIT_CAPACITY};
use crate::error::{DriveshError, Result};
use crate::progress::{ProgressCallback, TransferProgress};
use crate::vfs::{Node, RemoteStore};

/// Upload a local file into an existing file node.
///
/// Chunk order is preserved end to end: the conduit is FIFO with exactly
/// one producer and one consumer. The call returns only after the consumer
/// has finished, with the final byte total.
///
/// # Arguments
/// * `store` - Store holding the destination node
/// * `node` - Destination file node, replaced wholesale
/// * `src` - Local file to read
/// * `chunk_size` - Producer read size in bytes, 0 for the default
/// * `progress` - Invoked with the cumulative count after each chunk
pub async fn upload_from_path(
    store: &Arc<dyn RemoteStore>,
    node: &Node,
    src: &Path,
    chunk_size: usize,
    mut progress: Option<&mut ProgressCallback>,
) -> Result<u64> {
    if !node.is_file() {
        return Err(DriveshError::NotAFile(node.name.clone()));
    }
    let chunk_size = effective_chunk_size(chunk_size);

    let total = fs::metadata(src).await?.len();
    let mut source = fs::File::open(src).await?;

    let (tx, rx) = mpsc::channel::<io::Result<Bytes>>(CONDUIT_CAPACITY);

    // Consumer: hand the draining end of the conduit to the store as a
    // reader and let it pull until end-of-data.
    let consumer_store = Arc::clone(store);
    let consumer_node = node.clone();
    let consumer = tokio::spawn(async move {
        let reader = StreamReader::new(ReceiverStream::new(rx));
        consumer_store
            .write_stream(&consumer_node, Box::new(reader))
            .await
    });

    // Producer: forward local chunks until EOF or failure.
    let mut produced: u64 = 0;
    let mut produce_err: Option<DriveshError> = None;
    let mut buf = vec![0u8; chunk_size];
    loop {
        match source.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = Bytes::copy_from_slice(&buf[..n]);
                if tx.send(Ok(chunk)).await.is_err() {
                    // consumer stopped pulling; its error surfaces below
                    break;
                }
                produced += n as u64;
                if let Some(cb) = progress.as_deref_mut() {
                    cb(&TransferProgress::new(produced, total, &node.name));
                }
            }
            Err(e) => {
                let forwarded = io::Error::new(e.kind(), e.to_string());
                let _ = tx.send(Err(forwarded)).await;
                produce_err = Some(e.into());
                break;
            }
        }
    }
    // Dropping the sending half signals end-of-data to the consumer.
    drop(tx);

    let consumed = match consumer.await {
        Ok(result) => result,
        Err(join_err) => Err(DriveshError::Transfer(io::Error::new(
            io::ErrorKind::Other,
            format!("writer task failed: {join_err}"),
        ))),
    };

    // The local read failure is the root cause when both sides report one.
    if let Some(e) = produce_err {
        return Err(e);
    }
    let written = consumed?;
    if written != produced {
        return Err(DriveshError::Transfer(io::Error::new(
            io::ErrorKind::Other,
            format!("byte count mismatch: forwarded {produced}, store wrote {written}"),
        )));
    }

    debug!(file = %node.name, bytes = written, "upload complete");
    Ok(written)
}
