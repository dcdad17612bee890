//! Trie walker: matches a dotted key against the bit-packed trie.
//!
//! This is the hot path - every lookup goes through here. The walk is a
//! pure read-only traversal: it allocates nothing, mutates nothing but
//! its own bit cursors, and is safe to run concurrently over the same
//! snapshot from any number of threads.
//!
//! # Stream layout
//!
//! Keys are stored reversed, so the walk consumes the queried key from
//! its end (the top-level label first). Each node, starting at its bit
//! position, encodes:
//!
//! 1. a unary-coded shared-prefix length, then that many Huffman-coded
//!    edge characters;
//! 2. a dispatch table of Huffman-coded symbols in ascending order:
//!    symbol 0 terminates a stored entry (its metadata bits follow in
//!    place), symbol 127 ends the node, and any other symbol is a child
//!    edge followed by a 5-bit width and an absolute bit offset of the
//!    child node.
//!
//! Because dispatch symbols are sorted, the walk stops as soon as a
//! dispatch character overshoots the next key character.

use crate::bits::BitReader;
use crate::error::TrieError;
use crate::huffman::HuffmanDecoder;
use crate::snapshot::trie_stream::{
    END_OF_DISPATCH, END_OF_ENTRY, JUMP_WIDTH_BITS,
};

/// Borrowed inputs for a trie walk.
///
/// Typically produced by [`Snapshot::trie_config`](crate::Snapshot::trie_config);
/// the spans must outlive every walk performed against them.
#[derive(Debug, Clone, Copy)]
pub struct TrieConfig<'a> {
    /// Bit-packed trie data.
    pub trie: &'a [u8],
    /// Number of meaningful bits in `trie`.
    pub trie_bits: usize,
    /// Bit offset of the root node.
    pub root_position: usize,
    /// Flat Huffman table (root pair last).
    pub huffman: &'a [u8],
    /// Whether stored entries also match subdomains of their key.
    pub match_subdomains: bool,
}

/// Decodes the metadata bits embedded after a stored entry.
///
/// The walker invokes this at **every** entry terminator it encounters,
/// on-path or not, because only the decoder knows how wide an entry's
/// payload is; implementations must always consume exactly that payload
/// from `reader` so the walk can continue past it.
///
/// `on_path` is true when the entry lies on a still-viable match path
/// for the queried key; `key_offset` is `0` for an exact match and
/// otherwise `1 +` the index of the label boundary where the partial
/// match ends. Return `Ok(true)` to mark the lookup found (sticky; a
/// later entry cannot unset it, and only on-path entries should report
/// it), `Ok(false)` to skip, or `Err` to abort the walk as corrupt.
pub trait MetadataDecoder {
    fn decode_entry(
        &mut self,
        reader: &mut BitReader<'_>,
        on_path: bool,
        key_offset: usize,
    ) -> Result<bool, TrieError>;
}

impl<F> MetadataDecoder for F
where
    F: FnMut(&mut BitReader<'_>, bool, usize) -> Result<bool, TrieError>,
{
    fn decode_entry(
        &mut self,
        reader: &mut BitReader<'_>,
        on_path: bool,
        key_offset: usize,
    ) -> Result<bool, TrieError> {
        self(reader, on_path, key_offset)
    }
}

/// A validated trie ready to walk.
pub struct Trie<'a> {
    config: TrieConfig<'a>,
    decoder: HuffmanDecoder<'a>,
}

impl<'a> Trie<'a> {
    /// Validate `config` shape (root inside the trie, plausible Huffman
    /// table) and build a walker over it.
    pub fn new(config: TrieConfig<'a>) -> Result<Self, TrieError> {
        let decoder = HuffmanDecoder::new(config.huffman)?;
        if config.root_position >= config.trie_bits {
            return Err(TrieError::CorruptTrie(config.root_position));
        }
        Ok(Self { config, decoder })
    }

    /// Whether stored entries also match subdomains of their key.
    pub fn match_subdomains(&self) -> bool {
        self.config.match_subdomains
    }

    /// Match `key` against the trie, invoking `metadata` at every stored
    /// entry encountered along the way.
    ///
    /// Returns `Ok(true)` when a decoder reported an applicable entry,
    /// `Ok(false)` for a clean miss, and `Err` only when the trie data
    /// itself is malformed or a decoder aborted. The key is assumed to
    /// use the trie alphabet `[1, 126]`; front ends such as
    /// [`HostMatcher`](crate::HostMatcher) enforce that before calling.
    pub fn walk<M: MetadataDecoder>(
        &self,
        key: &str,
        metadata: &mut M,
    ) -> Result<bool, TrieError> {
        let key = key.as_bytes();
        let mut reader = BitReader::new(self.config.trie, self.config.trie_bits);
        let mut bit_offset = self.config.root_position;
        // Key characters not yet matched, counted from the front; the
        // walk consumes the key back-to-front.
        let mut remaining = key.len();
        let mut found = false;

        loop {
            if !reader.seek(bit_offset) {
                return Err(TrieError::CorruptTrie(bit_offset));
            }

            // Shared edge prefix.
            let prefix_len = reader.unary().ok_or(TrieError::UnexpectedEof)?;
            for _ in 0..prefix_len {
                if remaining == 0 {
                    // Key exhausted inside an edge label: nothing stored
                    // at or below here can match.
                    return Ok(found);
                }
                let c = self.decoder.decode(&mut reader)?;
                if c != key[remaining - 1] {
                    return Ok(found);
                }
                remaining -= 1;
            }

            // Dispatch table.
            loop {
                let c = self.decoder.decode(&mut reader)?;

                if c == END_OF_DISPATCH {
                    return Ok(found);
                }

                if c == END_OF_ENTRY {
                    let on_path = remaining == 0
                        || (self.config.match_subdomains && key[remaining - 1] == b'.');
                    if metadata.decode_entry(&mut reader, on_path, remaining)? {
                        found = true;
                    }
                    continue;
                }

                // Child edge. Entries are sorted, so overshooting the
                // next key character means no deeper match exists.
                if remaining == 0 || c > key[remaining - 1] {
                    return Ok(found);
                }

                let width = reader
                    .read(JUMP_WIDTH_BITS)
                    .ok_or(TrieError::UnexpectedEof)? as usize;
                let target =
                    reader.read(width).ok_or(TrieError::UnexpectedEof)? as usize;
                if target >= self.config.trie_bits {
                    return Err(TrieError::CorruptTrie(target));
                }

                if c == key[remaining - 1] {
                    remaining -= 1;
                    bit_offset = target;
                    break;
                }
                // c sorts before the key character: keep scanning this
                // dispatch table.
            }
        }
    }
}
