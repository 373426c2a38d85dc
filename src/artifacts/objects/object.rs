//! Object framing
//!
//! Every stored object is `<type> <decimal size>\0` followed by the payload.
//! The digest of that framed byte sequence is the object's identity.
//!
//! Large payloads are assembled in an [`ObjectBuffer`], which reserves a blank
//! prefix so the header can be written in front of the payload once its size
//! is known, without copying the payload again.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{HEADER_RESERVE, HEADER_SCAN_LIMIT};
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::Write;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Build the `<type> <size>\0` header for a payload of `size` bytes
pub fn encode_header(object_type: &ObjectType, size: usize) -> Vec<u8> {
    format!("{} {}\0", object_type.as_str(), size).into_bytes()
}

/// Frame a payload into a fresh buffer (header followed by payload)
pub fn frame(object_type: &ObjectType, payload: &[u8]) -> Bytes {
    let header = encode_header(object_type, payload.len());
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(&header);
    framed.extend_from_slice(payload);

    Bytes::from(framed)
}

/// Parse the header at the start of a decompressed object
///
/// # Returns
///
/// The type tag and the offset where the payload begins. The declared size
/// has already been checked against the bytes that follow the header.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize)> {
    let window = &data[..data.len().min(HEADER_SCAN_LIMIT)];

    let space = window
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| Error::CorruptObject(String::from("missing type separator")))?;
    let nul = window[space + 1..]
        .iter()
        .position(|&b| b == 0)
        .map(|pos| space + 1 + pos)
        .ok_or_else(|| Error::CorruptObject(String::from("missing header terminator")))?;

    let object_type = ObjectType::parse_object_type(&window[..space])?;
    let expected = parse_size(&window[space + 1..nul])?;

    let payload_start = nul + 1;
    let actual = (data.len() - payload_start) as u64;
    if expected != actual {
        return Err(Error::SizeMismatch { expected, actual });
    }

    Ok((object_type, payload_start))
}

fn parse_size(digits: &[u8]) -> Result<u64> {
    let leading_zero = digits.len() > 1 && digits[0] == b'0';
    if digits.is_empty() || leading_zero || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::CorruptObject(format!(
            "invalid object size {:?}",
            String::from_utf8_lossy(digits)
        )));
    }

    digits.iter().try_fold(0u64, |size, &digit| {
        size.checked_mul(10)
            .and_then(|size| size.checked_add(u64::from(digit - b'0')))
            .ok_or_else(|| Error::CorruptObject(String::from("object size overflows")))
    })
}

/// Decoded view of a framed object
///
/// The payload borrows the tail of the decoded buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject<'a> {
    pub object_type: ObjectType,
    pub payload: &'a [u8],
}

impl<'a> RawObject<'a> {
    pub fn decode(data: &'a [u8]) -> Result<Self> {
        let (object_type, payload_start) = parse_header(data)?;

        Ok(RawObject {
            object_type,
            payload: &data[payload_start..],
        })
    }
}

/// Write a header right-aligned in the blank prefix of `buffer`
///
/// `buffer` holds `HEADER_RESERVE` reserved bytes followed by the payload.
/// The header is placed so that it ends exactly at the payload, and the
/// returned offset is where the framed object starts; anything before it is
/// unused padding and must not be hashed or stored.
pub fn finish_buffer(object_type: &ObjectType, buffer: &mut [u8]) -> Result<usize> {
    if buffer.len() < HEADER_RESERVE {
        return Err(Error::MalformedInput(format!(
            "object buffer is missing its {HEADER_RESERVE}-byte header reserve"
        )));
    }

    let header = encode_header(object_type, buffer.len() - HEADER_RESERVE);
    let offset = HEADER_RESERVE.checked_sub(header.len()).ok_or_else(|| {
        Error::MalformedInput(format!(
            "object header of {} bytes does not fit the reserve",
            header.len()
        ))
    })?;

    buffer[offset..HEADER_RESERVE].copy_from_slice(&header);
    Ok(offset)
}

/// Growable payload buffer with room for the object header in front
#[derive(Debug, Clone)]
pub struct ObjectBuffer {
    buffer: Vec<u8>,
}

impl ObjectBuffer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(payload_capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(HEADER_RESERVE + payload_capacity);
        buffer.resize(HEADER_RESERVE, 0);

        ObjectBuffer { buffer }
    }

    /// Prefix the header and hand back the framed object
    pub fn finish(mut self, object_type: &ObjectType) -> Result<FramedObject> {
        let offset = finish_buffer(object_type, &mut self.buffer)?;

        Ok(FramedObject {
            buffer: self.buffer,
            offset,
        })
    }
}

impl Default for ObjectBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ObjectBuffer {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A framed object whose bytes start `offset` bytes into its buffer
#[derive(Debug, Clone)]
pub struct FramedObject {
    buffer: Vec<u8>,
    offset: usize,
}

impl FramedObject {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.offset..]
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::hash(self.as_bytes())
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer).slice(self.offset..)
    }
}
