use std::io;

use ogx_core::ObjectId;

/// Errors raised while reading or writing a registry stream.
///
/// Every decode error is fatal: the stream is assumed to be internally
/// consistent and no repair is attempted.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("unknown tag {tag} for object {id} at byte {offset}")]
    UnknownTag { id: ObjectId, tag: u8, offset: usize },
    #[error("stream terminated unexpectedly at byte {offset} ({needed} more bytes expected)")]
    Truncated { offset: usize, needed: usize },
    #[error("object {0} is defined twice")]
    DuplicateId(ObjectId),
    #[error("object {id} references {referenced}, which is never defined")]
    DanglingReference { id: ObjectId, referenced: ObjectId },
    #[error("stream ended without the end-of-stream marker")]
    MissingSentinel,
    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },
    #[error("negative length {length} at byte {offset}")]
    NegativeLength { offset: usize, length: i64 },
    #[error("{what} {value} out of range at byte {offset}")]
    OutOfRange {
        offset: usize,
        what: &'static str,
        value: i64,
    },
    #[error("invalid bool byte {byte:#04x} at byte {offset}")]
    InvalidBool { offset: usize, byte: u8 },
    #[error("object {id} nests deeper than {limit} levels at byte {offset}")]
    TooDeep { id: ObjectId, offset: usize, limit: u32 },
    #[error("object {id} carries `{key}` twice")]
    DuplicateKey { id: ObjectId, key: String },
    #[error("invalid free variable chain: {0}")]
    InvalidChain(String),
    #[error("trailing bytes after the end-of-stream marker at byte {offset}")]
    TrailingBytes { offset: usize },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
