//! Error kinds produced by the object store and the index codec
//!
//! Every decode and verify failure is returned to the immediate caller.
//! Nothing here is logged-and-continued, and corruption is never repaired.

use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Text that should have been a digest (or another small token) is not
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The requested object is absent from the store
    #[error("object {0} not found")]
    NotFound(ObjectId),

    /// The decompressed object does not carry a valid `<type> <size>\0` header
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// The header's declared size disagrees with the payload length
    #[error("object size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("bad index signature {0:#010x}")]
    BadSignature(u32),

    #[error("bad index version {0}")]
    BadVersion(u32),

    #[error("bad index checksum: header says {expected}, contents hash to {actual}")]
    BadChecksum { expected: ObjectId, actual: ObjectId },

    #[error("index file too short: {0} bytes")]
    TruncatedIndex(u64),

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// The active cache has already been populated in this process
    #[error("more than one cachefile")]
    AlreadyLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
