//! Plumbing commands
//!
//! Thin glue between the command line and the object store / active cache.
//!
//! ## Commands
//!
//! - `init-db`: Create the metadata directory and the object store shards
//! - `cat-file`: Dump an object's payload
//! - `hash-object`: Compute an object ID and optionally store the object
//! - `commit-tree`: Record a commit object for a tree
//! - `show-cache`: List the entries of the index

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod init_db;
pub mod show_cache;
