use crate::areas::config;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create `.dircache` and, unless a shared store is configured, the
    /// private object store with its 256 shard directories
    pub fn init_db(&mut self) -> anyhow::Result<()> {
        let dircache = self.path().join(config::DIRCACHE_DIR);
        fs::create_dir(&dircache)
            .with_context(|| format!("Unable to create {}", dircache.display()))?;

        if let Some(shared) = config::objects_override(self.path()) {
            if shared.is_dir() {
                writeln!(
                    self.writer(),
                    "Initialized empty dircache in {} using shared object store {}",
                    dircache.display(),
                    shared.display()
                )?;
                return Ok(());
            }

            tracing::warn!(
                path = %shared.display(),
                "{} set to bad directory, defaulting to private storage area",
                config::DB_ENVIRONMENT
            );
        }

        let objects = self.path().join(config::DEFAULT_DB_ENVIRONMENT);
        fs::create_dir_all(&objects)
            .with_context(|| format!("Unable to create {}", objects.display()))?;

        for shard in 0..=u8::MAX {
            let shard_path = objects.join(format!("{shard:02x}"));
            match fs::create_dir(&shard_path) {
                Err(e) if e.kind() != std::io::ErrorKind::AlreadyExists => {
                    return Err(e)
                        .with_context(|| format!("Unable to create {}", shard_path.display()));
                }
                _ => {}
            }
        }

        writeln!(
            self.writer(),
            "Initialized empty dircache in {}",
            dircache.display()
        )?;

        Ok(())
    }
}
