//! Core repository components
//!
//! - `config`: Where the object store and the index live
//! - `database`: Content-addressed object store
//! - `index`: The active cache loaded from the index file
//! - `repository`: Owned per-process state handed to the commands

pub mod config;
pub mod database;
pub mod index;
pub mod repository;
