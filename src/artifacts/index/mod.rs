//! Index ("cache") file format
//!
//! The index records the metadata of every staged file along with the digest
//! of its content object.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (32 bytes, little-endian):
//!   - Signature: 0x44495243 (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!   - SHA-1 of header[0..12] followed by every entry byte (20 bytes)
//!
//! Entries (variable length, consecutive):
//!   - ten 4-byte fields, 20-byte digest, 2-byte name length, name
//!   - zero padded to the next multiple of 8, always at least one pad byte
//! ```
//!
//! Nothing may follow the last entry.

pub mod checksum;
pub mod index_entry;
pub mod index_file;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 32;

/// Offset of the checksum inside the header; the bytes before it are hashed
pub const CHECKSUM_OFFSET: usize = 12;

/// Magic signature identifying index files ("DIRC" read as a little-endian word)
pub const SIGNATURE: u32 = 0x4449_5243;

/// Index file format version
pub const VERSION: u32 = 1;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of an entry before its name: ten u32 fields, digest, u16 name length
pub const ENTRY_FIXED_SIZE: usize = 10 * 4 + CHECKSUM_SIZE + 2;
