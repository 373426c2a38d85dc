use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Read;

impl Repository {
    /// Record a commit of `tree` with the given parents and a message read
    /// from `message`, printing the new commit's ID
    pub fn commit_tree(
        &mut self,
        tree: &str,
        parents: &[String],
        mut message: impl Read,
    ) -> anyhow::Result<ObjectId> {
        let tree_oid = ObjectId::from_hex(tree)?;
        let parents = parents
            .iter()
            .map(|parent| ObjectId::from_hex(parent))
            .collect::<Result<Vec<_>, _>>()?;

        if parents.is_empty() {
            tracing::info!("Committing initial tree {tree_oid}");
        }

        let committer = Author::load_committer()?;
        let author = Author::load_from_env(&committer);

        let mut message_bytes = Vec::new();
        message.read_to_end(&mut message_bytes)?;

        let commit = Commit::new(tree_oid, parents, author, committer, message_bytes)?;
        let framed = commit.to_framed()?;
        let commit_id = self.database().store_framed(framed.as_bytes())?;

        writeln!(self.writer(), "{commit_id}")?;

        Ok(commit_id)
    }
}
