//! Host-list text parser.
//!
//! The input format is one host per line. Blank lines and lines starting
//! with `#` are ignored; everything else must be a host over the trie
//! alphabet. Hosts are ASCII-lowercased and a trailing dot
//! (fully-qualified form) is stripped, matching the normalization the
//! matcher applies at query time.

use ht_core::snapshot::trie_stream::{MAX_KEY_BYTE, MIN_KEY_BYTE};

use crate::error::CompileError;

/// Parse a host list, failing on the first malformed line.
pub fn parse_host_list(text: &str) -> Result<Vec<String>, CompileError> {
    let mut hosts = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        hosts.push(parse_host(line, index + 1)?);
    }

    Ok(hosts)
}

fn parse_host(line: &str, line_number: usize) -> Result<String, CompileError> {
    let host = line.strip_suffix('.').unwrap_or(line);
    if host.is_empty() {
        return Err(CompileError::InvalidHost {
            line: line_number,
            message: "empty host".to_string(),
        });
    }

    for b in host.bytes() {
        if b.is_ascii_whitespace() {
            return Err(CompileError::InvalidHost {
                line: line_number,
                message: "host contains whitespace".to_string(),
            });
        }
        if !(MIN_KEY_BYTE..=MAX_KEY_BYTE).contains(&b) {
            return Err(CompileError::InvalidHost {
                line: line_number,
                message: format!("byte 0x{:02x} outside the trie alphabet", b),
            });
        }
    }

    Ok(host.to_ascii_lowercase())
}
