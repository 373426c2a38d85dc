//! Whole-file index decoding and encoding
//!
//! Decoding is all-or-nothing: entries are only returned once the header has
//! been verified and every record decoded without leftover bytes.

use crate::artifacts::index::checksum::{self, Checksum};
use crate::artifacts::index::index_entry::{IndexEntry, packed_size};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_OFFSET, HEADER_SIZE};
use crate::errors::{Error, Result};
use bytes::Bytes;

/// Verify a raw index image and decode its entries in file order
pub fn decode(data: &[u8]) -> Result<(IndexHeader, Vec<IndexEntry>)> {
    let header_bytes: &[u8; HEADER_SIZE] = data
        .get(..HEADER_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(Error::TruncatedIndex(data.len() as u64))?;
    let header = IndexHeader::unpack(header_bytes);

    checksum::verify(&header, data)?;

    // leave room to grow, but never trust the count beyond what the file can hold
    let entries_count = header.entries_count as usize;
    let max_entries = (data.len() - HEADER_SIZE) / packed_size(0);
    let mut entries = Vec::with_capacity((entries_count.min(max_entries) + 16) * 3 / 2);

    let mut offset = HEADER_SIZE;
    for _ in 0..entries_count {
        let (entry, consumed) = IndexEntry::unpack(data, offset)?;
        entries.push(entry);
        offset += consumed;
    }

    if offset != data.len() {
        return Err(Error::CorruptIndex(format!(
            "{} trailing bytes after {entries_count} entries",
            data.len() - offset
        )));
    }

    Ok((header, entries))
}

/// Build a complete, sealed index image for `entries`
pub fn encode(entries: &[IndexEntry]) -> Result<Bytes> {
    let entries_count = u32::try_from(entries.len()).map_err(|_| {
        Error::MalformedInput(format!("{} entries do not fit an index", entries.len()))
    })?;

    let mut data = IndexHeader::empty(entries_count).pack().to_vec();
    for entry in entries {
        data.extend_from_slice(&entry.pack()?);
    }

    let checksum = Checksum::of_index(&data);
    data[CHECKSUM_OFFSET..HEADER_SIZE].copy_from_slice(checksum.as_bytes());

    Ok(Bytes::from(data))
}
