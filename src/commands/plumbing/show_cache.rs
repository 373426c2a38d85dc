use crate::areas::repository::Repository;

impl Repository {
    /// List the loaded index as `<octal mode> <object id> <name>` lines
    pub fn show_cache(&mut self) -> anyhow::Result<()> {
        self.load_cache()?;

        let mut writer = self.writer();
        for entry in self.cache().entries() {
            writeln!(
                writer,
                "{:06o} {} {}",
                entry.metadata.mode,
                entry.oid,
                entry.path().display()
            )?;
        }

        Ok(())
    }
}
