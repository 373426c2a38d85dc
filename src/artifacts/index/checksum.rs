use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_OFFSET, HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};

/// Running SHA-1 over the parts of an index file that the header seals
#[derive(Debug, Clone, Default)]
pub struct Checksum {
    digest: Sha1,
}

impl Checksum {
    pub fn new() -> Self {
        Checksum {
            digest: Sha1::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    pub fn finish(self) -> ObjectId {
        let mut bytes = [0u8; OBJECT_ID_SIZE];
        bytes.copy_from_slice(&self.digest.finalize());
        ObjectId::from_bytes(bytes)
    }

    /// Checksum of a whole index image
    ///
    /// Covers the signature, version and entry count, then every byte after
    /// the header. The header's own checksum slot is never hashed.
    pub fn of_index(data: &[u8]) -> ObjectId {
        let mut checksum = Checksum::new();
        checksum.update(&data[..CHECKSUM_OFFSET.min(data.len())]);
        if data.len() > HEADER_SIZE {
            checksum.update(&data[HEADER_SIZE..]);
        }
        checksum.finish()
    }
}

/// Check signature, version and checksum of a raw index image
///
/// `header` must be the unpacked first 32 bytes of `data`.
pub fn verify(header: &IndexHeader, data: &[u8]) -> Result<()> {
    if header.signature != SIGNATURE {
        return Err(Error::BadSignature(header.signature));
    }

    if header.version != VERSION {
        return Err(Error::BadVersion(header.version));
    }

    let actual = Checksum::of_index(data);
    if actual != header.checksum {
        return Err(Error::BadChecksum {
            expected: header.checksum,
            actual,
        });
    }

    Ok(())
}
