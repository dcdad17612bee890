//! Huffman code construction for the trie's symbol alphabet.
//!
//! Builds an optimal prefix code from symbol frequencies, producing both
//! the per-symbol encode table used while serializing the trie and the
//! flat decoder table shipped in the snapshot. The decoder table layout
//! matches `ht_core::HuffmanDecoder`: two bytes per internal node, a set
//! high bit marking a 7-bit leaf symbol, child pairs addressed as
//! `byte * 2`, and the root pair stored **last**.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::CompileError;
use crate::writer::BitWriter;

enum TreeNode {
    Leaf(u8),
    Internal(usize, usize),
}

/// Encode table plus the serialized decoder table for one alphabet.
pub struct HuffmanCodes {
    /// Per-symbol `(code, bit length)`; length 0 marks an absent symbol.
    codes: [(u64, u8); 128],
    /// Flat decoder table, root pair last.
    table: Vec<u8>,
}

impl HuffmanCodes {
    /// Build codes for every symbol with a non-zero frequency.
    ///
    /// Ties are broken by insertion order, so identical inputs always
    /// produce identical tables.
    pub fn build(freqs: &[u32; 128]) -> Result<Self, CompileError> {
        let mut arena: Vec<TreeNode> = Vec::new();
        let mut heap = BinaryHeap::new();
        let mut seq = 0u32;

        for (symbol, &freq) in freqs.iter().enumerate() {
            if freq > 0 {
                arena.push(TreeNode::Leaf(symbol as u8));
                heap.push(Reverse((u64::from(freq), seq, arena.len() - 1)));
                seq += 1;
            }
        }

        if heap.is_empty() {
            return Err(CompileError::EmptyAlphabet);
        }

        let mut codes = [(0u64, 0u8); 128];

        if arena.len() == 1 {
            // A one-symbol alphabet still needs a decodable table: both
            // halves of the root pair carry the same leaf, and the
            // symbol costs one bit.
            if let TreeNode::Leaf(symbol) = arena[0] {
                codes[symbol as usize] = (0, 1);
                return Ok(Self {
                    codes,
                    table: vec![0x80 | symbol, 0x80 | symbol],
                });
            }
        }

        let root = loop {
            let Reverse((weight_a, _, a)) = match heap.pop() {
                Some(node) => node,
                None => return Err(CompileError::EmptyAlphabet),
            };
            let Reverse((weight_b, _, b)) = match heap.pop() {
                Some(node) => node,
                None => break a,
            };
            arena.push(TreeNode::Internal(a, b));
            heap.push(Reverse((weight_a + weight_b, seq, arena.len() - 1)));
            seq += 1;
        };
        let mut table = Vec::new();
        emit(&arena, root, &mut table, &mut codes, 0, 0)?;
        Ok(Self { codes, table })
    }

    /// Append `symbol`'s code to `writer`.
    pub fn encode(&self, writer: &mut BitWriter, symbol: u8) -> Result<(), CompileError> {
        let &(code, len) = self
            .codes
            .get(symbol as usize)
            .ok_or(CompileError::MissingCode(symbol))?;
        if len == 0 {
            return Err(CompileError::MissingCode(symbol));
        }
        for i in (0..len).rev() {
            writer.write_bit(((code >> i) & 1) as u8);
        }
        Ok(())
    }

    /// Bit length of `symbol`'s code, or 0 when absent.
    pub fn code_len(&self, symbol: u8) -> u8 {
        self.codes.get(symbol as usize).map_or(0, |&(_, len)| len)
    }

    /// Serialized decoder table (root pair last).
    pub fn table(&self) -> &[u8] {
        &self.table
    }
}

/// Emit the subtree at `idx` post-order, assigning codes on the way
/// down. Returns the byte that encodes this subtree in its parent pair.
fn emit(
    arena: &[TreeNode],
    idx: usize,
    out: &mut Vec<u8>,
    codes: &mut [(u64, u8); 128],
    code: u64,
    len: u8,
) -> Result<u8, CompileError> {
    match arena[idx] {
        TreeNode::Leaf(symbol) => {
            if len > 64 {
                return Err(CompileError::CodeTooLong(symbol));
            }
            codes[symbol as usize] = (code, len);
            Ok(0x80 | symbol)
        }
        TreeNode::Internal(left, right) => {
            let left_byte = emit(arena, left, out, codes, code << 1, len + 1)?;
            let right_byte = emit(arena, right, out, codes, (code << 1) | 1, len + 1)?;
            let pair_index = out.len() / 2;
            if pair_index > 0x7f {
                return Err(CompileError::HuffmanTableOverflow);
            }
            out.push(left_byte);
            out.push(right_byte);
            Ok(pair_index as u8)
        }
    }
}
