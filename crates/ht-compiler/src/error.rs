use thiserror::Error;

/// Compiler error types
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("line {line}: {message}")]
    InvalidHost { line: usize, message: String },

    #[error("host list produced an empty symbol alphabet")]
    EmptyAlphabet,

    #[error("no huffman code for symbol {0}")]
    MissingCode(u8),

    #[error("huffman table exceeds the 128-pair addressing limit")]
    HuffmanTableOverflow,

    #[error("huffman code for symbol {0} exceeds 64 bits")]
    CodeTooLong(u8),

    #[error("trie too large to address with 31-bit jumps")]
    TrieTooLarge,
}
