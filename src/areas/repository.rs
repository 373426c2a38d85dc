use crate::areas::config;
use crate::areas::database::Database;
use crate::areas::index::ActiveCache;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Per-process state threaded through every command
///
/// Owns the object store (and its lazily resolved root) and the active
/// cache, so neither lives in a global.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    cache: ActiveCache,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.canonicalize()?;

        let database = Database::new(path.clone().into_boxed_path());
        let cache = ActiveCache::new(config::index_path(&path).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            cache,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn cache(&self) -> &ActiveCache {
        &self.cache
    }

    /// Load the active cache against this repository's object store
    pub fn load_cache(&mut self) -> crate::errors::Result<()> {
        self.cache.load(&self.database)
    }
}
