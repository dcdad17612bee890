//! HTR1 snapshot container: format constants and the zero-copy loader.

pub mod format;
pub mod loader;

pub use format::{
    align_offset, header, read_u16_le, read_u32_le, trie_stream, validate_magic, HeaderFlags,
    HEADER_SIZE, HTR_MAGIC, HTR_VERSION,
};
pub use loader::{Snapshot, SnapshotError};
