//! Object identifiers, type tags and framing
//!
//! Every object is stored as `<type> <size>\0<payload>`, compressed, and named
//! by the SHA-1 digest of the uncompressed framed bytes.

pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in bytes
pub const OBJECT_ID_SIZE: usize = 20;

/// Longest accepted type tag
pub const MAX_TYPE_LENGTH: usize = 32;

/// How far into a decompressed object the header may extend
pub const HEADER_SCAN_LIMIT: usize = 128;

/// Blank prefix reserved ahead of a payload for its header
pub const HEADER_RESERVE: usize = 64;
