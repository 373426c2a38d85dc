//! Plumbing for a content-addressable object store and its binary index.
//!
//! - `artifacts`: byte-level formats (digests, object framing, index records)
//! - `areas`: the object store, the active cache and the repository state
//! - `commands`: the command-line plumbing built on top

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
