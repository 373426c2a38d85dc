//! On-disk data structures
//!
//! - `index`: Index file header, entries and checksum
//! - `objects`: Object identifiers, type tags, framing and commits

pub mod index;
pub mod objects;
