// tree-serializer/src/error.rs

use thiserror::Error;

/// Error type for encoding, decoding and persisting labeled trees.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Destination buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Truncated input at offset {offset}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Decoded {consumed} bytes but input holds {expected}")]
    LengthMismatch { consumed: usize, expected: usize },

    #[error("Child record at offset {offset} consumed no bytes")]
    EmptyChildRecord { offset: usize },

    #[error("Invalid has-payload flag {flag:#04x} at offset {offset}")]
    InvalidPayloadFlag { offset: usize, flag: u8 },

    #[error("Label at offset {offset} is not valid UTF-8")]
    InvalidLabel { offset: usize },

    #[error("Label is {0} bytes, at most 255 allowed")]
    LabelTooLong(usize),

    #[error("Content size {0} does not fit the 4-byte size field")]
    ContentTooLarge(usize),

    #[error("Nesting deeper than the configured maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for tree codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
