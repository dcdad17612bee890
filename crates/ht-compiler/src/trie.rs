//! Trie construction and bit-level serialization.
//!
//! Keys are inserted reversed so the stored structure branches on the
//! top-level label first, matching the walker's suffix-first traversal.
//! Serialization is children-first (post-order): every child's absolute
//! bit position is known by the time its parent's dispatch table is
//! written, and the root lands last.

use std::collections::BTreeMap;

use ht_core::snapshot::trie_stream::{END_OF_DISPATCH, END_OF_ENTRY, JUMP_WIDTH_BITS};

use crate::error::CompileError;
use crate::huffman::HuffmanCodes;
use crate::writer::BitWriter;

/// Bits stored immediately after an entry terminator.
///
/// Membership-only snapshots use the default zero-width payload; custom
/// deployments may attach up to 32 bits per entry, which their
/// `MetadataDecoder` must consume during walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Payload {
    pub bits: u32,
    pub width: u8,
}

struct Node {
    /// Edge characters shared by everything below this node, in
    /// reversed-key order.
    prefix: Vec<u8>,
    entry: Option<Payload>,
    /// Child edges keyed by their first character; BTreeMap keeps the
    /// dispatch table sorted, which the walker's early exit relies on.
    children: BTreeMap<u8, Node>,
}

impl Node {
    fn leaf(prefix: Vec<u8>, payload: Payload) -> Self {
        Self {
            prefix,
            entry: Some(payload),
            children: BTreeMap::new(),
        }
    }
}

/// Serialized trie ready for snapshot assembly.
pub struct TrieData {
    pub bytes: Vec<u8>,
    pub bits: usize,
    pub root_position: usize,
}

/// Edge-compressed radix trie over reversed keys.
pub struct TrieBuilder {
    root: Node,
    entry_count: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            root: Node {
                prefix: Vec::new(),
                entry: None,
                children: BTreeMap::new(),
            },
            entry_count: 0,
        }
    }

    /// Insert a key with no metadata payload.
    pub fn insert(&mut self, key: &str) {
        self.insert_with_payload(key, Payload::default());
    }

    /// Insert a key; a duplicate insert replaces the earlier payload.
    pub fn insert_with_payload(&mut self, key: &str, payload: Payload) {
        let reversed: Vec<u8> = key.bytes().rev().collect();
        if self.entry_count == 0 && self.root.entry.is_none() && self.root.children.is_empty() {
            // First key: the root's edge is the whole key.
            self.root.prefix = reversed;
            self.root.entry = Some(payload);
            self.entry_count = 1;
            return;
        }
        if insert_into(&mut self.root, &reversed, payload) {
            self.entry_count += 1;
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Count how often each symbol appears in the serialized stream, the
    /// input for Huffman code construction.
    pub fn symbol_frequencies(&self) -> [u32; 128] {
        let mut freqs = [0u32; 128];
        count_symbols(&self.root, &mut freqs);
        freqs
    }

    /// Serialize into the bit format the walker consumes.
    pub fn serialize(&self, codes: &HuffmanCodes) -> Result<TrieData, CompileError> {
        let mut writer = BitWriter::new();
        let root_position = write_node(&self.root, codes, &mut writer)?;
        let bits = writer.position();
        Ok(TrieData {
            bytes: writer.into_bytes(),
            bits,
            root_position,
        })
    }
}

/// Returns true when `key` was not already present.
fn insert_into(node: &mut Node, key: &[u8], payload: Payload) -> bool {
    let lcp = node
        .prefix
        .iter()
        .zip(key)
        .take_while(|(a, b)| a == b)
        .count();

    if lcp < node.prefix.len() {
        // Split this node's edge: everything past the divergence moves
        // into a child reached on the first diverging character.
        let split_char = node.prefix[lcp];
        let child = Node {
            prefix: node.prefix[lcp + 1..].to_vec(),
            entry: node.entry.take(),
            children: std::mem::take(&mut node.children),
        };
        node.prefix.truncate(lcp);
        node.children.insert(split_char, child);
    }

    let rest = &key[lcp..];
    match rest.split_first() {
        None => {
            let is_new = node.entry.is_none();
            node.entry = Some(payload);
            is_new
        }
        Some((&c, tail)) => match node.children.get_mut(&c) {
            Some(child) => insert_into(child, tail, payload),
            None => {
                node.children.insert(c, Node::leaf(tail.to_vec(), payload));
                true
            }
        },
    }
}

fn count_symbols(node: &Node, freqs: &mut [u32; 128]) {
    for &c in &node.prefix {
        freqs[c as usize] += 1;
    }
    if node.entry.is_some() {
        freqs[END_OF_ENTRY as usize] += 1;
    }
    for (&c, child) in &node.children {
        freqs[c as usize] += 1;
        count_symbols(child, freqs);
    }
    freqs[END_OF_DISPATCH as usize] += 1;
}

/// Serialize the subtree rooted at `node`, children first, returning the
/// bit position where `node` itself begins.
fn write_node(
    node: &Node,
    codes: &HuffmanCodes,
    writer: &mut BitWriter,
) -> Result<usize, CompileError> {
    let mut child_positions = Vec::with_capacity(node.children.len());
    for (&c, child) in &node.children {
        child_positions.push((c, write_node(child, codes, writer)?));
    }

    let position = writer.position();
    writer.unary(node.prefix.len());
    for &c in &node.prefix {
        codes.encode(writer, c)?;
    }
    if let Some(payload) = &node.entry {
        codes.encode(writer, END_OF_ENTRY)?;
        writer.write_bits(payload.bits, payload.width as usize);
    }
    for (c, child_position) in child_positions {
        codes.encode(writer, c)?;
        write_jump(writer, child_position)?;
    }
    codes.encode(writer, END_OF_DISPATCH)?;
    Ok(position)
}

fn write_jump(writer: &mut BitWriter, position: usize) -> Result<(), CompileError> {
    let width = usize::BITS - position.leading_zeros();
    if width > 31 {
        return Err(CompileError::TrieTooLarge);
    }
    writer.write_bits(width, JUMP_WIDTH_BITS);
    writer.write_bits(position as u32, width as usize);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ht_core::{BitReader, MetadataDecoder, Trie, TrieConfig, TrieError};

    fn build(keys: &[&str], payloads: &[Payload]) -> (Vec<u8>, usize, usize, Vec<u8>) {
        let mut builder = TrieBuilder::new();
        for (i, key) in keys.iter().enumerate() {
            let payload = payloads.get(i).copied().unwrap_or_default();
            builder.insert_with_payload(key, payload);
        }
        let codes = HuffmanCodes::build(&builder.symbol_frequencies()).unwrap();
        let data = builder.serialize(&codes).unwrap();
        (data.bytes, data.bits, data.root_position, codes.table().to_vec())
    }

    fn walk(
        trie: &(Vec<u8>, usize, usize, Vec<u8>),
        key: &str,
        match_subdomains: bool,
    ) -> Result<bool, TrieError> {
        let t = Trie::new(TrieConfig {
            trie: &trie.0,
            trie_bits: trie.1,
            root_position: trie.2,
            huffman: &trie.3,
            match_subdomains,
        })?;
        struct Membership;
        impl MetadataDecoder for Membership {
            fn decode_entry(
                &mut self,
                _reader: &mut BitReader<'_>,
                on_path: bool,
                _key_offset: usize,
            ) -> Result<bool, TrieError> {
                Ok(on_path)
            }
        }
        t.walk(key, &mut Membership)
    }

    #[test]
    fn test_single_key_round_trip() {
        let trie = build(&["com"], &[]);
        assert_eq!(walk(&trie, "com", false), Ok(true));
        assert_eq!(walk(&trie, "org", false), Ok(false));
        assert_eq!(walk(&trie, "co", false), Ok(false));
        assert_eq!(walk(&trie, "comm", false), Ok(false));
    }

    #[test]
    fn test_sibling_keys() {
        let trie = build(&["example.com", "example.org", "example.net"], &[]);
        assert_eq!(walk(&trie, "example.com", false), Ok(true));
        assert_eq!(walk(&trie, "example.org", false), Ok(true));
        assert_eq!(walk(&trie, "example.net", false), Ok(true));
        assert_eq!(walk(&trie, "example.edu", false), Ok(false));
        assert_eq!(walk(&trie, "sample.com", false), Ok(false));
    }

    #[test]
    fn test_key_that_is_suffix_of_another() {
        // "ample.com" ends every walk through "example.com"'s path early.
        let trie = build(&["example.com", "ample.com", "com"], &[]);
        assert_eq!(walk(&trie, "com", false), Ok(true));
        assert_eq!(walk(&trie, "ample.com", false), Ok(true));
        assert_eq!(walk(&trie, "example.com", false), Ok(true));
        assert_eq!(walk(&trie, "xample.com", false), Ok(false));
        assert_eq!(walk(&trie, "e.com", false), Ok(false));
    }

    #[test]
    fn test_subdomain_matching() {
        let trie = build(&["example.com"], &[]);
        assert_eq!(walk(&trie, "foo.example.com", true), Ok(true));
        assert_eq!(walk(&trie, "a.b.example.com", true), Ok(true));
        assert_eq!(walk(&trie, "foo.example.com", false), Ok(false));
        // Suffix without a dot boundary must not match.
        assert_eq!(walk(&trie, "notexample.com", true), Ok(false));
        assert_eq!(walk(&trie, "example.com", true), Ok(true));
    }

    #[test]
    fn test_branching_after_shared_suffix() {
        let trie = build(&["mail.google.com", "maps.google.com", "google.com"], &[]);
        assert_eq!(walk(&trie, "mail.google.com", false), Ok(true));
        assert_eq!(walk(&trie, "maps.google.com", false), Ok(true));
        assert_eq!(walk(&trie, "google.com", false), Ok(true));
        assert_eq!(walk(&trie, "mapmail.google.com", false), Ok(false));
    }

    #[test]
    fn test_duplicate_insert_counted_once() {
        let mut builder = TrieBuilder::new();
        builder.insert("example.com");
        builder.insert("example.com");
        assert_eq!(builder.entry_count(), 1);
    }

    #[test]
    fn test_empty_trie_serializes_and_misses() {
        let builder = TrieBuilder::new();
        let codes = HuffmanCodes::build(&builder.symbol_frequencies()).unwrap();
        let data = builder.serialize(&codes).unwrap();
        let trie = (data.bytes, data.bits, data.root_position, codes.table().to_vec());
        assert_eq!(walk(&trie, "anything", false), Ok(false));
    }

    #[test]
    fn test_entry_payloads_round_trip() {
        let trie = build(
            &["a.com", "com"],
            &[Payload { bits: 0b101, width: 3 }, Payload { bits: 0b01, width: 3 }],
        );

        struct Collect {
            seen: Vec<(bool, usize, u32)>,
        }
        impl MetadataDecoder for Collect {
            fn decode_entry(
                &mut self,
                reader: &mut BitReader<'_>,
                on_path: bool,
                key_offset: usize,
            ) -> Result<bool, TrieError> {
                let value = reader.read(3).ok_or(TrieError::UnexpectedEof)?;
                self.seen.push((on_path, key_offset, value));
                Ok(on_path)
            }
        }

        let t = Trie::new(TrieConfig {
            trie: &trie.0,
            trie_bits: trie.1,
            root_position: trie.2,
            huffman: &trie.3,
            match_subdomains: false,
        })
        .unwrap();

        let mut collect = Collect { seen: Vec::new() };
        assert_eq!(t.walk("a.com", &mut collect), Ok(true));
        // The walk passes "com"'s entry off-path before reaching "a.com".
        assert_eq!(collect.seen, vec![(false, 2, 0b01), (true, 0, 0b101)]);
    }

    #[test]
    fn test_root_position_is_last_node() {
        let mut builder = TrieBuilder::new();
        builder.insert("ab");
        builder.insert("b");
        let codes = HuffmanCodes::build(&builder.symbol_frequencies()).unwrap();
        let data = builder.serialize(&codes).unwrap();
        // Children serialize first; the root starts after them.
        assert!(data.root_position > 0);
        assert!(data.root_position < data.bits);
    }
}
