//! HTR1 snapshot assembly.

use ht_core::hash::crc32;
use ht_core::snapshot::{align_offset, header, HeaderFlags, HEADER_SIZE, HTR_MAGIC, HTR_VERSION};

use crate::error::CompileError;
use crate::huffman::HuffmanCodes;
use crate::trie::TrieBuilder;

/// Compile `hosts` into a complete HTR1 snapshot.
///
/// Entries carry no metadata payload, so the result is a pure membership
/// set queryable through `ht_core::HostMatcher`. The output always
/// carries a CRC32.
pub fn build_snapshot(hosts: &[String], match_subdomains: bool) -> Result<Vec<u8>, CompileError> {
    let mut trie = TrieBuilder::new();
    for host in hosts {
        trie.insert(host);
    }

    let codes = HuffmanCodes::build(&trie.symbol_frequencies())?;
    let trie_data = trie.serialize(&codes)?;
    let table = codes.table();

    let huffman_offset = HEADER_SIZE;
    let trie_offset = align_offset(huffman_offset + table.len(), 4);
    let total_size = trie_offset + trie_data.bytes.len();

    if trie_data.bits > u32::MAX as usize || total_size > u32::MAX as usize {
        return Err(CompileError::TrieTooLarge);
    }

    let mut buffer = vec![0u8; total_size];

    buffer[..4].copy_from_slice(&HTR_MAGIC);
    write_u16_le(&mut buffer, header::VERSION, HTR_VERSION);

    let mut flags = HeaderFlags::HAS_CRC32;
    if match_subdomains {
        flags |= HeaderFlags::MATCH_SUBDOMAINS;
    }
    write_u16_le(&mut buffer, header::FLAGS, flags.bits());

    write_u32_le(&mut buffer, header::HUFFMAN_OFFSET, huffman_offset as u32);
    write_u32_le(&mut buffer, header::HUFFMAN_LEN, table.len() as u32);
    write_u32_le(&mut buffer, header::TRIE_OFFSET, trie_offset as u32);
    write_u32_le(&mut buffer, header::TRIE_LEN, trie_data.bytes.len() as u32);
    write_u32_le(&mut buffer, header::TRIE_BITS, trie_data.bits as u32);
    write_u32_le(&mut buffer, header::ROOT_POSITION, trie_data.root_position as u32);
    write_u32_le(&mut buffer, header::ENTRY_COUNT, trie.entry_count() as u32);

    buffer[huffman_offset..huffman_offset + table.len()].copy_from_slice(table);
    buffer[trie_offset..].copy_from_slice(&trie_data.bytes);

    // The CRC covers the file with its own field still zero.
    let checksum = crc32(&buffer);
    write_u32_le(&mut buffer, header::CRC32, checksum);

    log::debug!(
        "built snapshot: {} entries, {} huffman bytes, {} trie bits",
        trie.entry_count(),
        table.len(),
        trie_data.bits
    );

    Ok(buffer)
}

fn write_u16_le(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
