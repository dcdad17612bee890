//! hufftrie Core Library
//!
//! This crate provides the matching engine for hufftrie: compact
//! membership tests for host names (or similar dotted hierarchical keys)
//! against a precompiled, Huffman-coded trie snapshot.
//!
//! # Architecture
//!
//! The engine operates on a pre-compiled binary snapshot (HTR1 format)
//! holding two read-only byte spans: a flat Huffman table and a
//! bit-packed trie whose edge characters are Huffman-coded. The hot path
//! does no allocations and uses zero-copy views into the snapshot data;
//! per-call state is limited to bit cursors, so concurrent lookups over
//! one snapshot need no locking.
//!
//! # Modules
//!
//! - `bits`: MSB-first bit reader over borrowed bytes
//! - `huffman`: byte-pair Huffman tree decoder (root at the last pair)
//! - `trie`: the trie walker and the metadata decoder seam
//! - `snapshot`: HTR1 format constants and zero-copy loader
//! - `matcher`: host normalization + membership lookups
//! - `hash`: CRC32 for snapshot integrity
//! - `error`: the walk/decode error taxonomy

pub mod bits;
pub mod error;
pub mod hash;
pub mod huffman;
pub mod matcher;
pub mod snapshot;
pub mod trie;

// Re-export commonly used types
pub use bits::BitReader;
pub use error::TrieError;
pub use huffman::HuffmanDecoder;
pub use matcher::HostMatcher;
pub use snapshot::{Snapshot, SnapshotError};
pub use trie::{MetadataDecoder, Trie, TrieConfig};
