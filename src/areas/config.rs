//! Where the object store and the index live
//!
//! The object store root comes from `DB_ENVIRONMENT` when it is set and
//! non-empty, and defaults to `.dircache/objects` otherwise. Relative paths are
//! taken relative to the repository directory.

use std::path::{Path, PathBuf};

/// Environment variable naming an alternate object store root
pub const DB_ENVIRONMENT: &str = "DB_ENVIRONMENT";

/// Metadata directory inside the repository
pub const DIRCACHE_DIR: &str = ".dircache";

/// Default object store root, relative to the repository
pub const DEFAULT_DB_ENVIRONMENT: &str = ".dircache/objects";

/// Index file, relative to the repository
pub const INDEX_FILE: &str = ".dircache/index";

/// Store root named by the environment, if any
pub fn objects_override(base: &Path) -> Option<PathBuf> {
    std::env::var_os(DB_ENVIRONMENT)
        .filter(|value| !value.is_empty())
        .map(|value| base.join(value))
}

/// Resolve the object store root for a repository at `base`
pub fn resolve_objects_root(base: &Path) -> PathBuf {
    objects_override(base).unwrap_or_else(|| base.join(DEFAULT_DB_ENVIRONMENT))
}

pub fn index_path(base: &Path) -> PathBuf {
    base.join(INDEX_FILE)
}
