//! Zero-copy HTR1 Snapshot Loader

use crate::hash::crc32;
use crate::trie::TrieConfig;

use super::format::*;

/// Error type for snapshot loading.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid magic bytes")]
    InvalidMagic,
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),
    #[error("CRC32 mismatch: stored={stored}, computed={computed}")]
    Crc32Mismatch { stored: u32, computed: u32 },
    #[error("Invalid span: {0}")]
    InvalidSpan(&'static str),
    #[error("Data too short")]
    DataTooShort,
}

/// Zero-copy snapshot view.
///
/// Borrows the raw snapshot bytes; the huffman table and trie accessors
/// return subslices of the same buffer. The buffer must outlive every
/// walk performed against it.
pub struct Snapshot<'a> {
    pub version: u16,
    pub entry_count: u32,
    flags: HeaderFlags,
    huffman: &'a [u8],
    trie: &'a [u8],
    trie_bits: usize,
    root_position: usize,
}

impl<'a> Snapshot<'a> {
    /// Load a snapshot from bytes, validating the header, the optional
    /// checksum, and every span bound before any of it is dereferenced.
    pub fn load(data: &'a [u8]) -> Result<Self, SnapshotError> {
        if data.len() < HEADER_SIZE {
            return Err(SnapshotError::DataTooShort);
        }

        if !validate_magic(data) {
            return Err(SnapshotError::InvalidMagic);
        }

        let version = read_u16_le(data, header::VERSION);
        if version != HTR_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let flags = HeaderFlags::from_bits_truncate(read_u16_le(data, header::FLAGS));

        if flags.contains(HeaderFlags::HAS_CRC32) {
            let stored = read_u32_le(data, header::CRC32);

            // Compute the CRC over the file with the CRC field zeroed.
            let mut crc_data = data.to_vec();
            crc_data[header::CRC32..header::CRC32 + 4].fill(0);
            let computed = crc32(&crc_data);

            if stored != computed {
                return Err(SnapshotError::Crc32Mismatch { stored, computed });
            }
        }

        let huffman_offset = read_u32_le(data, header::HUFFMAN_OFFSET) as usize;
        let huffman_len = read_u32_le(data, header::HUFFMAN_LEN) as usize;
        let trie_offset = read_u32_le(data, header::TRIE_OFFSET) as usize;
        let trie_len = read_u32_le(data, header::TRIE_LEN) as usize;
        let trie_bits = read_u32_le(data, header::TRIE_BITS) as usize;
        let root_position = read_u32_le(data, header::ROOT_POSITION) as usize;
        let entry_count = read_u32_le(data, header::ENTRY_COUNT);

        let huffman = span(data, huffman_offset, huffman_len, "huffman table")?;
        if huffman.len() < 2 || huffman.len() % 2 != 0 {
            return Err(SnapshotError::InvalidSpan("huffman table shape"));
        }

        let trie = span(data, trie_offset, trie_len, "trie data")?;
        if trie_bits > trie.len() * 8 {
            return Err(SnapshotError::InvalidSpan("trie bit count"));
        }
        if root_position >= trie_bits {
            return Err(SnapshotError::InvalidSpan("trie root position"));
        }

        log::debug!(
            "loaded HTR1 snapshot: {} entries, {} trie bits, {} huffman bytes",
            entry_count,
            trie_bits,
            huffman.len()
        );

        Ok(Self {
            version,
            entry_count,
            flags,
            huffman,
            trie,
            trie_bits,
            root_position,
        })
    }

    /// Whether entries also match subdomains of their stored key.
    pub fn match_subdomains(&self) -> bool {
        self.flags.contains(HeaderFlags::MATCH_SUBDOMAINS)
    }

    /// Raw Huffman table bytes.
    pub fn huffman(&self) -> &'a [u8] {
        self.huffman
    }

    /// Raw trie bytes.
    pub fn trie(&self) -> &'a [u8] {
        self.trie
    }

    /// Number of meaningful bits in the trie data.
    pub fn trie_bits(&self) -> usize {
        self.trie_bits
    }

    /// Bit offset of the trie root node.
    pub fn root_position(&self) -> usize {
        self.root_position
    }

    /// Walker configuration borrowing this snapshot's spans.
    pub fn trie_config(&self) -> TrieConfig<'a> {
        TrieConfig {
            trie: self.trie,
            trie_bits: self.trie_bits,
            root_position: self.root_position,
            huffman: self.huffman,
            match_subdomains: self.match_subdomains(),
        }
    }
}

fn span<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], SnapshotError> {
    let end = offset.checked_add(len).ok_or(SnapshotError::InvalidSpan(what))?;
    if offset < HEADER_SIZE || end > data.len() {
        return Err(SnapshotError::InvalidSpan(what));
    }
    Ok(&data[offset..end])
}
