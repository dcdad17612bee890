//! Host membership front end over a loaded snapshot.
//!
//! Wraps the raw trie walk with host normalization and the zero-payload
//! membership decoder used by snapshots the compiler produces: entries
//! carry no metadata bits, so an entry applies exactly when it lies on
//! the match path.

use crate::bits::BitReader;
use crate::error::TrieError;
use crate::snapshot::trie_stream::{MAX_KEY_BYTE, MIN_KEY_BYTE};
use crate::snapshot::Snapshot;
use crate::trie::{MetadataDecoder, Trie};

/// Entry decoder for membership-only snapshots: no payload bits.
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

/// Membership lookups for host names against a loaded snapshot.
pub struct HostMatcher<'a> {
    trie: Trie<'a>,
}

impl<'a> HostMatcher<'a> {
    /// Build a matcher over `snapshot`'s trie.
    pub fn new(snapshot: &Snapshot<'a>) -> Result<Self, TrieError> {
        Ok(Self {
            trie: Trie::new(snapshot.trie_config())?,
        })
    }

    /// Test whether `host` is in the set.
    ///
    /// The host is ASCII-lowercased before matching; a trailing dot
    /// (fully-qualified form) is ignored. Hosts containing bytes outside
    /// the trie alphabet are rejected as [`TrieError::InvalidKey`].
    pub fn contains(&self, host: &str) -> Result<bool, TrieError> {
        let host = host.strip_suffix('.').unwrap_or(host);
        if host.is_empty() {
            return Err(TrieError::InvalidKey);
        }
        for b in host.bytes() {
            if !(MIN_KEY_BYTE..=MAX_KEY_BYTE).contains(&b) || b.is_ascii_whitespace() {
                return Err(TrieError::InvalidKey);
            }
        }

        if host.bytes().any(|b| b.is_ascii_uppercase()) {
            self.trie.walk(&host.to_ascii_lowercase(), &mut Membership)
        } else {
            self.trie.walk(host, &mut Membership)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::format::{header, HeaderFlags, HEADER_SIZE, HTR_MAGIC, HTR_VERSION};

    /// Hand-assembled snapshot holding exactly "a".
    ///
    /// Huffman table: 00 -> END_OF_ENTRY, 01 -> END_OF_DISPATCH,
    /// 10 -> 'a', 11 -> 'b'. Trie: unary(1), 'a', entry, end.
    fn snapshot_bytes(match_subdomains: bool) -> Vec<u8> {
        let table = [0x80u8, 0xff, 0x80 | b'a', 0x80 | b'b', 0x00, 0x01];
        let trie = [0b1010_0001u8];

        let mut buf = vec![0u8; HEADER_SIZE + table.len() + trie.len()];
        buf[..4].copy_from_slice(&HTR_MAGIC);
        buf[header::VERSION..header::VERSION + 2]
            .copy_from_slice(&HTR_VERSION.to_le_bytes());
        let flags = if match_subdomains {
            HeaderFlags::MATCH_SUBDOMAINS.bits()
        } else {
            0
        };
        buf[header::FLAGS..header::FLAGS + 2].copy_from_slice(&flags.to_le_bytes());
        let put = |buf: &mut Vec<u8>, at: usize, v: u32| {
            buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
        };
        put(&mut buf, header::HUFFMAN_OFFSET, HEADER_SIZE as u32);
        put(&mut buf, header::HUFFMAN_LEN, table.len() as u32);
        put(&mut buf, header::TRIE_OFFSET, (HEADER_SIZE + table.len()) as u32);
        put(&mut buf, header::TRIE_LEN, trie.len() as u32);
        put(&mut buf, header::TRIE_BITS, 8);
        put(&mut buf, header::ROOT_POSITION, 0);
        put(&mut buf, header::ENTRY_COUNT, 1);

        let table_at = HEADER_SIZE;
        buf[table_at..table_at + table.len()].copy_from_slice(&table);
        buf[table_at + table.len()..].copy_from_slice(&trie);
        buf
    }

    #[test]
    fn test_contains_exact() {
        let data = snapshot_bytes(false);
        let snapshot = Snapshot::load(&data).unwrap();
        let matcher = HostMatcher::new(&snapshot).unwrap();

        assert_eq!(matcher.contains("a"), Ok(true));
        assert_eq!(matcher.contains("b"), Ok(false));
    }

    #[test]
    fn test_contains_normalizes_case_and_fqdn_dot() {
        let data = snapshot_bytes(false);
        let snapshot = Snapshot::load(&data).unwrap();
        let matcher = HostMatcher::new(&snapshot).unwrap();

        assert_eq!(matcher.contains("A"), Ok(true));
        assert_eq!(matcher.contains("a."), Ok(true));
    }

    #[test]
    fn test_contains_subdomain() {
        let data = snapshot_bytes(true);
        let snapshot = Snapshot::load(&data).unwrap();
        let matcher = HostMatcher::new(&snapshot).unwrap();

        assert_eq!(matcher.contains("b.a"), Ok(true));
        assert_eq!(matcher.contains("ba"), Ok(false));
    }

    #[test]
    fn test_rejects_invalid_hosts() {
        let data = snapshot_bytes(false);
        let snapshot = Snapshot::load(&data).unwrap();
        let matcher = HostMatcher::new(&snapshot).unwrap();

        assert_eq!(matcher.contains(""), Err(TrieError::InvalidKey));
        assert_eq!(matcher.contains("with space"), Err(TrieError::InvalidKey));
        assert_eq!(matcher.contains("emoji🦀"), Err(TrieError::InvalidKey));
        assert_eq!(matcher.contains("nul\0byte"), Err(TrieError::InvalidKey));
    }
}
