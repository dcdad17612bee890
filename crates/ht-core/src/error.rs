//! Error type for trie walks and Huffman decoding.

use thiserror::Error;

/// Failures surfaced while walking a trie or decoding its Huffman stream.
///
/// "Key not found" is never an error; lookups report it through their
/// boolean result. An `Err` always means the snapshot data itself is
/// unusable (truncated, corrupt, or rejected by a metadata decoder).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    /// The bit stream ran out in the middle of a required structure.
    #[error("bit stream exhausted mid-structure")]
    UnexpectedEof,

    /// A Huffman table node referenced a byte offset past the table end,
    /// or the table shape is invalid (odd or empty).
    #[error("corrupt huffman table: offset {offset} out of {len} bytes")]
    CorruptHuffman { offset: usize, len: usize },

    /// A Huffman decode walked more internal nodes than the table holds.
    /// A well-formed acyclic table always terminates sooner.
    #[error("huffman decode did not terminate (cyclic table)")]
    HuffmanCycle,

    /// A trie jump or the configured root referenced a bit offset past the
    /// end of the trie data.
    #[error("trie offset {0} out of bounds")]
    CorruptTrie(usize),

    /// The queried key contains bytes outside the trie alphabet `[1, 126]`.
    #[error("key contains bytes outside the trie alphabet")]
    InvalidKey,

    /// A metadata decoder found an entry's embedded payload invalid.
    #[error("metadata decoder rejected entry data")]
    BadMetadata,
}
