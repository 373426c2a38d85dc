use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Dump an object's payload
    ///
    /// By default the payload goes to a fresh `temp_git_file_*` file in the
    /// repository and `<file>: <type>` is printed; with `print` the payload
    /// itself is written out.
    pub fn cat_file(&mut self, object_id: &str, print: bool) -> anyhow::Result<()> {
        let object_id = ObjectId::from_hex(object_id)?;
        let (object_type, payload) = self
            .database()
            .load(&object_id)
            .with_context(|| format!("Unable to read object {object_id}"))?;

        if print {
            self.writer().write_all(&payload)?;
            return Ok(());
        }

        let mut temp_file = tempfile::Builder::new()
            .prefix("temp_git_file_")
            .tempfile_in(self.path())
            .context("Unable to create tempfile")?;
        temp_file.write_all(&payload)?;
        let (_, temp_path) = temp_file.keep()?;

        let shown = temp_path.strip_prefix(self.path()).unwrap_or(&temp_path);
        writeln!(self.writer(), "{}: {}", shown.display(), object_type)?;

        Ok(())
    }
}
