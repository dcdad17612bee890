//! hufftrie Snapshot Compiler
//!
//! This crate compiles plain host lists into the HTR1 snapshot format
//! consumed by `ht-core`: a Huffman table over the trie's symbol
//! alphabet plus a bit-packed trie of reversed keys. The compiler owns
//! the bit-level layout; the core walker only ever consumes it.
//!
//! # Examples
//!
//! ```
//! use ht_compiler::build_snapshot;
//! use ht_core::{HostMatcher, Snapshot};
//!
//! let hosts = vec!["example.com".to_string()];
//! let bytes = build_snapshot(&hosts, true).unwrap();
//!
//! let snapshot = Snapshot::load(&bytes).unwrap();
//! let matcher = HostMatcher::new(&snapshot).unwrap();
//! assert!(matcher.contains("www.example.com").unwrap());
//! assert!(!matcher.contains("example.org").unwrap());
//! ```

pub mod builder;
pub mod error;
pub mod huffman;
pub mod optimizer;
pub mod parser;
pub mod trie;
pub mod writer;

pub use builder::build_snapshot;
pub use error::CompileError;
pub use huffman::HuffmanCodes;
pub use optimizer::{optimize_hosts, OptimizeStats};
pub use parser::parse_host_list;
pub use trie::{Payload, TrieBuilder, TrieData};
pub use writer::BitWriter;
