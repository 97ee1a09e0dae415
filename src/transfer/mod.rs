//! Chunked transfer pipeline between local files and store streams.

mod download;
mod upload;

pub use download::download_to_path;
pub use upload::upload_from_path;

/// Default transfer chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Capacity of the upload conduit, in chunks. The producer blocks once
/// this many chunks are waiting for the store to drain them.
pub const CONDUIT_CAPACITY: usize = 8;

/// Resolve a requested chunk size, treating zero as "use the default".
pub fn effective_chunk_size(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        requested
    }
}
