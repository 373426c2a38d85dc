use crate::artifacts::index::{CHECKSUM_OFFSET, HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ByteOrder, LittleEndian};
use derive_new::new;

/// Fixed 32-byte header at the start of the index file
///
/// Unpacking never validates anything; the checksum module decides whether
/// the signature, version and checksum can be trusted.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: u32,
    pub version: u32,
    pub entries_count: u32,
    pub checksum: ObjectId,
}

impl IndexHeader {
    /// Header for a current-version file with a checksum still to be filled in
    pub fn empty(entries_count: u32) -> Self {
        IndexHeader {
            signature: SIGNATURE,
            version: VERSION,
            entries_count,
            checksum: ObjectId::default(),
        }
    }

    pub fn pack(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        LittleEndian::write_u32(&mut bytes[0..4], self.signature);
        LittleEndian::write_u32(&mut bytes[4..8], self.version);
        LittleEndian::write_u32(&mut bytes[8..12], self.entries_count);
        bytes[CHECKSUM_OFFSET..].copy_from_slice(self.checksum.as_bytes());

        bytes
    }

    pub fn unpack(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut checksum = [0u8; HEADER_SIZE - CHECKSUM_OFFSET];
        checksum.copy_from_slice(&bytes[CHECKSUM_OFFSET..]);

        IndexHeader {
            signature: LittleEndian::read_u32(&bytes[0..4]),
            version: LittleEndian::read_u32(&bytes[4..8]),
            entries_count: LittleEndian::read_u32(&bytes[8..12]),
            checksum: ObjectId::from_bytes(checksum),
        }
    }
}
