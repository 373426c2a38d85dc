//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 20-byte SHA-1 digests. They name every object in the store
//! and also seal the index file.
//!
//! ## Format
//!
//! - Binary: 20 raw bytes (inside index headers and entries)
//! - Text: 40 lowercase hexadecimal characters
//!
//! ## Storage
//!
//! Objects are stored in `<objects>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::path::PathBuf;
use std::str::FromStr;

/// SHA-1 digest identifying an object (or an index file's contents)
///
/// The binary and textual forms round-trip exactly; parsing normalizes
/// hex input to lowercase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    /// Digest an arbitrary byte sequence
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);

        let mut bytes = [0u8; OBJECT_ID_SIZE];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Read a digest from a 20-byte slice
    ///
    /// Fails unless the slice is exactly 20 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; OBJECT_ID_SIZE] = bytes.try_into().map_err(|_| {
            Error::MalformedInput(format!("expected {OBJECT_ID_SIZE} digest bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Parse and validate an object ID from its hex form
    ///
    /// # Arguments
    ///
    /// * `id` - 40 hexadecimal characters, either case
    ///
    /// # Returns
    ///
    /// The decoded digest, or `MalformedInput` if the text does not decode
    /// to exactly 20 bytes
    pub fn from_hex(id: &str) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::MalformedInput(format!(
                "invalid object ID length {}: {id:?}",
                id.len()
            )));
        }

        let mut bytes = [0u8; OBJECT_ID_SIZE];
        hex::decode_to_slice(id, &mut bytes)
            .map_err(|e| Error::MalformedInput(format!("invalid object ID {id:?}: {e}")))?;

        Ok(Self(bytes))
    }

    /// 40 lowercase hex characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_SIZE] {
        &self.0
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first byte.
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
