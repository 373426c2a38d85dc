//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps, device and inode)
//!
//! ## Entry Format
//!
//! ```text
//! offset  size  field
//!      0     4  ctime seconds
//!      4     4  ctime nanoseconds
//!      8     4  mtime seconds
//!     12     4  mtime nanoseconds
//!     16     4  device
//!     20     4  inode
//!     24     4  mode
//!     28     4  uid
//!     32     4  gid
//!     36     4  size
//!     40    20  object digest
//!     60     2  name length
//!     62     n  name
//! ```
//!
//! All integers are little-endian. The record is zero padded up to the next
//! multiple of 8, and always carries at least one pad byte after the name.

use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_FIXED_SIZE};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use derive_new::new;
use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Seconds and nanoseconds of a file timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct CacheTime {
    pub sec: u32,
    pub nsec: u32,
}

/// File metadata stored in index entries
///
/// Every field is stored as 32 bits on disk, so wider stat values are
/// truncated by whoever fills this in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Status change time
    pub ctime: CacheTime,
    /// Content modification time
    pub mtime: CacheTime,
    pub dev: u32,
    pub ino: u32,
    /// File mode (type and permissions)
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes
    pub size: u32,
}

/// Index entry representing a staged file
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the working tree root
    pub name: PathBuf,
    /// Digest of the file's content object
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

/// Size of the packed record for a name of `name_len` bytes
///
/// Rounds up to the next multiple of 8 strictly above the unpadded length,
/// so a record that would end on a block boundary gains a whole pad block.
pub fn packed_size(name_len: usize) -> usize {
    (ENTRY_FIXED_SIZE + name_len + ENTRY_BLOCK) & !(ENTRY_BLOCK - 1)
}

impl IndexEntry {
    pub fn name_bytes(&self) -> &[u8] {
        self.name.as_os_str().as_bytes()
    }

    pub fn path(&self) -> &Path {
        &self.name
    }

    /// Size this entry occupies in the index file
    pub fn packed_size(&self) -> usize {
        packed_size(self.name_bytes().len())
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let name = self.name_bytes();
        let name_len = u16::try_from(name.len()).map_err(|_| {
            Error::MalformedInput(format!(
                "entry name of {} bytes is too long for the index",
                name.len()
            ))
        })?;
        let metadata = &self.metadata;

        let mut entry_bytes = Vec::with_capacity(self.packed_size());
        entry_bytes.write_u32::<LittleEndian>(metadata.ctime.sec)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.ctime.nsec)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.mtime.sec)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.mtime.nsec)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.dev)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.ino)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.mode)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.uid)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.gid)?;
        entry_bytes.write_u32::<LittleEndian>(metadata.size)?;
        entry_bytes.write_all(self.oid.as_bytes())?;
        entry_bytes.write_u16::<LittleEndian>(name_len)?;
        entry_bytes.write_all(name)?;

        // at least one NUL after the name, then up to the block boundary
        entry_bytes.resize(self.packed_size(), 0);

        Ok(entry_bytes)
    }

    /// Decode the entry that starts at `offset`
    ///
    /// # Returns
    ///
    /// The entry and the number of bytes its padded record occupies, which
    /// is where the next entry begins relative to `offset`.
    pub fn unpack(bytes: &[u8], offset: usize) -> Result<(Self, usize)> {
        let fixed = offset
            .checked_add(ENTRY_FIXED_SIZE)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| {
                Error::CorruptIndex(format!("entry at offset {offset} runs past end of index"))
            })?;

        let name_len = LittleEndian::read_u16(&fixed[60..62]) as usize;
        let consumed = packed_size(name_len);
        if offset + consumed > bytes.len() {
            return Err(Error::CorruptIndex(format!(
                "entry at offset {offset} declares a {name_len}-byte name past end of index"
            )));
        }

        let name_start = offset + ENTRY_FIXED_SIZE;
        let name = &bytes[name_start..name_start + name_len];
        let field = |at: usize| LittleEndian::read_u32(&fixed[at..at + 4]);

        let mut oid = [0u8; OBJECT_ID_SIZE];
        oid.copy_from_slice(&fixed[40..60]);

        let entry = IndexEntry {
            name: PathBuf::from(OsStr::from_bytes(name)),
            oid: ObjectId::from_bytes(oid),
            metadata: EntryMetadata {
                ctime: CacheTime::new(field(0), field(4)),
                mtime: CacheTime::new(field(8), field(12)),
                dev: field(16),
                ino: field(20),
                mode: field(24),
                uid: field(28),
                gid: field(32),
                size: field(36),
            },
        };

        Ok((entry, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn metadata() -> EntryMetadata {
        EntryMetadata {
            ctime: CacheTime::new(1_700_000_001, 11),
            mtime: CacheTime::new(1_700_000_002, 22),
            dev: 0x0803,
            ino: 4242,
            mode: 0o100644,
            uid: 1000,
            gid: 100,
            size: 6,
        }
    }

    fn entry_named(name: &str, metadata: EntryMetadata) -> IndexEntry {
        IndexEntry::new(PathBuf::from(name), ObjectId::hash(name.as_bytes()), metadata)
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(6)]
    #[case(10)]
    #[case(300)]
    fn pack_then_unpack_restores_every_field(#[case] name_len: usize, metadata: EntryMetadata) {
        let entry = entry_named(&"n".repeat(name_len), metadata);

        let bytes = entry.pack().unwrap();
        let (unpacked, consumed) = IndexEntry::unpack(&bytes, 0).unwrap();

        pretty_assertions::assert_eq!(unpacked, entry);
        pretty_assertions::assert_eq!(consumed, bytes.len());
        assert_eq!(bytes.len() % ENTRY_BLOCK, 0);
        assert!(bytes.len() >= ENTRY_FIXED_SIZE + name_len + 1);
        assert!(bytes[ENTRY_FIXED_SIZE + name_len..].iter().all(|&b| b == 0));
    }

    #[test]
    fn record_on_block_boundary_gains_a_full_pad_block() {
        // 62 + 2 = 64 is already aligned, so the record grows to 72
        pretty_assertions::assert_eq!(packed_size(2), 72);
        pretty_assertions::assert_eq!(packed_size(1), 64);
        pretty_assertions::assert_eq!(packed_size(0), 64);
        pretty_assertions::assert_eq!(packed_size(10), 80);
    }

    #[rstest]
    fn fields_are_written_at_their_offsets(metadata: EntryMetadata) {
        let entry = entry_named("hello.txt", metadata);
        let bytes = entry.pack().unwrap();

        pretty_assertions::assert_eq!(LittleEndian::read_u32(&bytes[0..4]), 1_700_000_001);
        pretty_assertions::assert_eq!(LittleEndian::read_u32(&bytes[24..28]), 0o100644);
        pretty_assertions::assert_eq!(&bytes[40..60], entry.oid.as_bytes());
        pretty_assertions::assert_eq!(LittleEndian::read_u16(&bytes[60..62]), 9);
        pretty_assertions::assert_eq!(&bytes[62..71], b"hello.txt");
    }

    /// Each of the four time fields is written from its own source value;
    /// none is ever filled in from the ctime seconds.
    #[test]
    fn time_fields_round_trip_independently() {
        let metadata = EntryMetadata {
            ctime: CacheTime::new(1, 2),
            mtime: CacheTime::new(3, 4),
            ..Default::default()
        };
        let entry = entry_named("t", metadata);

        let bytes = entry.pack().unwrap();
        let fields = (0..4)
            .map(|i| LittleEndian::read_u32(&bytes[i * 4..i * 4 + 4]))
            .collect::<Vec<_>>();
        pretty_assertions::assert_eq!(fields, vec![1, 2, 3, 4]);

        let (unpacked, _) = IndexEntry::unpack(&bytes, 0).unwrap();

        pretty_assertions::assert_eq!(unpacked.metadata.ctime, CacheTime::new(1, 2));
        pretty_assertions::assert_eq!(unpacked.metadata.mtime, CacheTime::new(3, 4));
    }

    #[rstest]
    fn unpack_reads_at_offset_and_reports_consumed(metadata: EntryMetadata) {
        let first = entry_named("a", metadata.clone());
        let second = entry_named("second/entry.rs", metadata);
        let mut bytes = first.pack().unwrap();
        bytes.extend(second.pack().unwrap());

        let (decoded_first, consumed) = IndexEntry::unpack(&bytes, 0).unwrap();
        let (decoded_second, rest) = IndexEntry::unpack(&bytes, consumed).unwrap();

        pretty_assertions::assert_eq!(decoded_first, first);
        pretty_assertions::assert_eq!(decoded_second, second);
        pretty_assertions::assert_eq!(consumed + rest, bytes.len());
    }

    #[rstest]
    fn unpack_rejects_truncated_fixed_fields(metadata: EntryMetadata) {
        let bytes = entry_named("a", metadata).pack().unwrap();

        assert!(matches!(
            IndexEntry::unpack(&bytes[..ENTRY_FIXED_SIZE - 1], 0),
            Err(Error::CorruptIndex(_))
        ));
        assert!(matches!(
            IndexEntry::unpack(&bytes, bytes.len()),
            Err(Error::CorruptIndex(_))
        ));
        assert!(matches!(
            IndexEntry::unpack(&bytes, usize::MAX - 4),
            Err(Error::CorruptIndex(_))
        ));
    }

    #[rstest]
    fn unpack_rejects_name_length_past_end(metadata: EntryMetadata) {
        let mut bytes = entry_named("abc", metadata).pack().unwrap();
        LittleEndian::write_u16(&mut bytes[60..62], u16::MAX);

        assert!(matches!(
            IndexEntry::unpack(&bytes, 0),
            Err(Error::CorruptIndex(_))
        ));
    }

    #[rstest]
    fn unpack_rejects_missing_padding(metadata: EntryMetadata) {
        let bytes = entry_named("abc", metadata).pack().unwrap();

        assert!(matches!(
            IndexEntry::unpack(&bytes[..ENTRY_FIXED_SIZE + 3], 0),
            Err(Error::CorruptIndex(_))
        ));
    }

    #[test]
    fn pack_rejects_names_longer_than_the_length_field() {
        let entry = entry_named(&"x".repeat(u16::MAX as usize + 1), EntryMetadata::default());

        assert!(matches!(entry.pack(), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn non_utf8_names_survive() {
        let name = PathBuf::from(OsStr::from_bytes(b"caf\xe9"));
        let entry = IndexEntry::new(name.clone(), ObjectId::default(), EntryMetadata::default());

        let (unpacked, _) = IndexEntry::unpack(&entry.pack().unwrap(), 0).unwrap();

        pretty_assertions::assert_eq!(unpacked.name, name);
    }
}
