use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn hash_object(
        &mut self,
        object_path: &Path,
        object_type: &str,
        write: bool,
    ) -> anyhow::Result<()> {
        let object_type = ObjectType::try_from(object_type)?;

        // read object file
        let file_path = self.path().join(object_path);
        let object_data = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read {}", file_path.display()))?;

        // hash, and write as a compressed object file if asked to
        let object_id = if write {
            self.database().store(&object_type, &object_data)?
        } else {
            Database::hash_object(&object_type, &object_data)
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
