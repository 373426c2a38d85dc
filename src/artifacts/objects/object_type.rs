use crate::artifacts::objects::MAX_TYPE_LENGTH;
use crate::errors::{Error, Result};

/// Type tag carried in an object header
///
/// The framing format admits any short ASCII tag, so this is an open set:
/// `blob`, `tree` and `commit` are provided as constants but other tags
/// round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectType(String);

impl ObjectType {
    pub const BLOB: &'static str = "blob";
    pub const TREE: &'static str = "tree";
    pub const COMMIT: &'static str = "commit";

    pub fn blob() -> Self {
        Self(String::from(Self::BLOB))
    }

    pub fn tree() -> Self {
        Self(String::from(Self::TREE))
    }

    pub fn commit() -> Self {
        Self(String::from(Self::COMMIT))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate a tag read from an object header
    ///
    /// A tag is 1 to `MAX_TYPE_LENGTH` printable ASCII bytes with no space.
    pub fn parse_object_type(tag: &[u8]) -> Result<ObjectType> {
        if tag.is_empty() || tag.len() > MAX_TYPE_LENGTH {
            return Err(Error::CorruptObject(format!(
                "invalid object type length {}",
                tag.len()
            )));
        }
        if !tag.iter().all(u8::is_ascii_graphic) {
            return Err(Error::CorruptObject(format!(
                "invalid object type {:?}",
                String::from_utf8_lossy(tag)
            )));
        }

        // all bytes are ASCII at this point
        Ok(Self(tag.iter().map(|&b| b as char).collect()))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse_object_type(value.as_bytes())
            .map_err(|_| Error::MalformedInput(format!("invalid object type {value:?}")))
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
