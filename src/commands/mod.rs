//! Command implementations
//!
//! Every command is an `impl Repository` block in `plumbing`, writing its
//! output through the repository's writer.

pub mod plumbing;
