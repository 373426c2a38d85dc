//! Active cache (the loaded index)
//!
//! The index records which files are staged, along with their stat metadata
//! and the digest of their content. A process loads it at most once; after a
//! successful load the entries are read-only.
//!
//! ## Loading
//!
//! - A missing index file is not an error: the cache stays empty
//! - The whole file is read under a shared lock and verified before any
//!   entry is trusted
//! - Any failure leaves the cache empty and unloaded

use crate::areas::database::Database;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::{HEADER_SIZE, index_file};
use crate::errors::{Error, Result};
use std::io::Read;
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug)]
pub struct ActiveCache {
    /// Path to the index file (typically `.dircache/index`)
    path: Box<Path>,
    /// Entries in the order they appear in the file
    entries: Vec<IndexEntry>,
    loaded: bool,
}

impl ActiveCache {
    pub fn new(path: Box<Path>) -> Self {
        ActiveCache {
            path,
            entries: Vec::new(),
            loaded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load the index from disk
    ///
    /// Requires the object store root to be an accessible directory. Fails
    /// with `AlreadyLoaded` if an earlier call succeeded.
    pub fn load(&mut self, database: &Database) -> Result<()> {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }

        let objects_path = database.objects_path();
        if !objects_path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no access to object directory {}", objects_path.display()),
            )));
        }

        let Some(data) = self.read_index()? else {
            tracing::debug!(path = %self.path.display(), "no index file, cache left empty");
            self.loaded = true;
            return Ok(());
        };

        let (_, entries) = index_file::decode(&data).inspect_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "rejected index file");
        })?;

        tracing::debug!(entries = entries.len(), "loaded index");
        self.entries = entries;
        self.loaded = true;

        Ok(())
    }

    fn read_index(&self) -> Result<Option<Vec<u8>>> {
        let mut index_file = match std::fs::OpenOptions::new().read(true).open(self.path()) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let size = lock.deref_mut().metadata()?.len();
        if size < HEADER_SIZE as u64 {
            return Err(Error::TruncatedIndex(size));
        }

        let mut data = Vec::with_capacity(size as usize);
        lock.deref_mut().read_to_end(&mut data)?;

        Ok(Some(data))
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its path
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| entry.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::index_entry::{CacheTime, EntryMetadata};
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    struct Fixture {
        dir: TempDir,
        database: Database,
        cache: ActiveCache,
    }

    impl Fixture {
        fn write_index(&self, data: &[u8]) {
            std::fs::write(self.cache.path(), data).unwrap();
        }
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let objects = dir.path().join("objects");
        std::fs::create_dir_all(&objects).unwrap();

        Fixture {
            database: Database::at(objects.into_boxed_path()),
            cache: ActiveCache::new(dir.path().join("index").into_boxed_path()),
            dir,
        }
    }

    fn entries() -> Vec<IndexEntry> {
        vec![
            IndexEntry::new(
                PathBuf::from("README"),
                ObjectId::hash(b"readme"),
                EntryMetadata {
                    ctime: CacheTime::new(10, 1),
                    mtime: CacheTime::new(20, 2),
                    mode: 0o100644,
                    size: 6,
                    ..Default::default()
                },
            ),
            IndexEntry::new(
                PathBuf::from("src/main.rs"),
                ObjectId::hash(b"main"),
                EntryMetadata {
                    mode: 0o100755,
                    ..Default::default()
                },
            ),
        ]
    }

    #[rstest]
    fn missing_index_loads_empty(mut fixture: Fixture) {
        fixture.cache.load(&fixture.database).unwrap();

        assert!(fixture.cache.is_loaded());
        assert!(fixture.cache.is_empty());
    }

    #[rstest]
    fn zero_entry_index_loads_empty(mut fixture: Fixture) {
        fixture.write_index(&index_file::encode(&[]).unwrap());

        fixture.cache.load(&fixture.database).unwrap();

        assert!(fixture.cache.is_loaded());
        pretty_assertions::assert_eq!(fixture.cache.len(), 0);
    }

    #[rstest]
    fn load_keeps_file_order(mut fixture: Fixture) {
        fixture.write_index(&index_file::encode(&entries()).unwrap());

        fixture.cache.load(&fixture.database).unwrap();

        pretty_assertions::assert_eq!(fixture.cache.entries(), &entries()[..]);
        assert!(fixture.cache.entry_by_path(Path::new("src/main.rs")).is_some());
        assert!(fixture.cache.entry_by_path(Path::new("missing")).is_none());
    }

    #[rstest]
    fn second_load_is_rejected_and_keeps_entries(mut fixture: Fixture) {
        fixture.write_index(&index_file::encode(&entries()).unwrap());
        fixture.cache.load(&fixture.database).unwrap();

        // a different index must not replace what is loaded
        fixture.write_index(&index_file::encode(&[]).unwrap());

        assert!(matches!(
            fixture.cache.load(&fixture.database),
            Err(Error::AlreadyLoaded)
        ));
        pretty_assertions::assert_eq!(fixture.cache.entries(), &entries()[..]);
    }

    #[rstest]
    fn second_load_after_missing_index_is_rejected(mut fixture: Fixture) {
        fixture.cache.load(&fixture.database).unwrap();

        assert!(matches!(
            fixture.cache.load(&fixture.database),
            Err(Error::AlreadyLoaded)
        ));
    }

    #[rstest]
    fn flipped_bit_fails_checksum_and_leaves_cache_empty(mut fixture: Fixture) {
        let mut data = index_file::encode(&entries()).unwrap().to_vec();
        data[HEADER_SIZE + 70] ^= 0x04;
        fixture.write_index(&data);

        assert!(matches!(
            fixture.cache.load(&fixture.database),
            Err(Error::BadChecksum { .. })
        ));
        assert!(!fixture.cache.is_loaded());
        assert!(fixture.cache.is_empty());
    }

    #[rstest]
    fn failed_load_can_be_retried(mut fixture: Fixture) {
        fixture.write_index(b"short");
        assert!(matches!(
            fixture.cache.load(&fixture.database),
            Err(Error::TruncatedIndex(5))
        ));

        fixture.write_index(&index_file::encode(&entries()).unwrap());
        fixture.cache.load(&fixture.database).unwrap();

        pretty_assertions::assert_eq!(fixture.cache.len(), 2);
    }

    #[rstest]
    fn bad_signature_is_rejected(mut fixture: Fixture) {
        let mut data = index_file::encode(&entries()).unwrap().to_vec();
        data[..4].copy_from_slice(b"CACH");
        fixture.write_index(&data);

        assert!(matches!(
            fixture.cache.load(&fixture.database),
            Err(Error::BadSignature(_))
        ));
        assert!(fixture.cache.is_empty());
    }

    #[rstest]
    fn missing_object_directory_is_an_error(fixture: Fixture) {
        let Fixture { dir, mut cache, .. } = fixture;
        let database = Database::at(dir.path().join("nowhere").into_boxed_path());

        assert!(matches!(cache.load(&database), Err(Error::Io(_))));
        assert!(!cache.is_loaded());
    }
}
