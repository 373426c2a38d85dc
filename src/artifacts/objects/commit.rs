//! Commit object payload
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>            (zero or more)
//! author <name> <<email>> <date>
//! committer <name> <<email>> <date>
//!
//! <commit message>
//! ```
//!
//! Dates use the ctime layout, e.g. `Mon Jan  2 15:04:05 2006`.

use crate::artifacts::objects::object::{FramedObject, ObjectBuffer, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::Write;

/// Most parents a single commit may name
pub const MAX_PARENTS: usize = 16;

const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    date: String,
}

impl Author {
    /// Create an author stamped with the given time
    pub fn new(
        name: &str,
        email: &str,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Self::with_date(name, email, &timestamp.format(CTIME_FORMAT).to_string())
    }

    /// Create an author with a preformatted date
    ///
    /// Newlines and angle brackets are stripped from every field so a value
    /// cannot break the line structure of the commit.
    pub fn with_date(name: &str, email: &str, date: &str) -> Self {
        Author {
            name: remove_special(name),
            email: remove_special(email),
            date: remove_special(date),
        }
    }

    /// The person running the command: login name at host name, now
    pub fn load_committer() -> Result<Self> {
        let login = ["USER", "LOGNAME", "USERNAME"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
            .ok_or_else(|| Error::MalformedInput(String::from("You don't exist. Go away!")))?;
        let host = std::env::var("HOSTNAME")
            .ok()
            .filter(|host| !host.is_empty())
            .or_else(|| {
                std::fs::read_to_string("/etc/hostname")
                    .ok()
                    .map(|host| host.trim().to_string())
                    .filter(|host| !host.is_empty())
            })
            .unwrap_or_else(|| String::from("localhost"));

        Ok(Author::new(
            &login,
            &format!("{login}@{host}"),
            chrono::Local::now().fixed_offset(),
        ))
    }

    /// Derive the author from the committer, honouring overrides
    ///
    /// Reads `COMMITTER_NAME`, `COMMITTER_EMAIL` and `COMMITTER_DATE`; each
    /// missing variable falls back to the committer's value.
    pub fn load_from_env(committer: &Author) -> Self {
        let var = |key: &str| std::env::var(key).ok();

        Author::with_date(
            &var("COMMITTER_NAME").unwrap_or_else(|| committer.name.clone()),
            &var("COMMITTER_EMAIL").unwrap_or_else(|| committer.email.clone()),
            &var("COMMITTER_DATE").unwrap_or_else(|| committer.date.clone()),
        )
    }

    /// Format as `Name <email> date`
    pub fn display(&self) -> String {
        format!("{} <{}> {}", self.name, self.email, self.date)
    }
}

fn remove_special(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\n' | '<' | '>'))
        .collect()
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    /// Parent commit IDs, in the order given
    parents: Vec<ObjectId>,
    author: Author,
    committer: Author,
    message: Vec<u8>,
}

impl Commit {
    /// Create a new commit
    ///
    /// # Arguments
    ///
    /// * `tree_oid` - Tree object representing the snapshot
    /// * `parents` - Parent commit IDs (empty for an initial commit)
    /// * `author` - Who wrote the change
    /// * `committer` - Who recorded it
    /// * `message` - Commit message, copied verbatim
    pub fn new(
        tree_oid: ObjectId,
        parents: Vec<ObjectId>,
        author: Author,
        committer: Author,
        message: Vec<u8>,
    ) -> Result<Self> {
        if parents.len() > MAX_PARENTS {
            return Err(Error::MalformedInput(format!(
                "a commit may have at most {MAX_PARENTS} parents, got {}",
                parents.len()
            )));
        }

        Ok(Commit {
            tree_oid,
            parents,
            author,
            committer,
            message,
        })
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// Assemble the payload behind a header reserve and frame it in place
    pub fn to_framed(&self) -> Result<FramedObject> {
        let mut buffer = ObjectBuffer::with_capacity(256 + self.message.len());

        writeln!(buffer, "tree {}", self.tree_oid)?;
        for parent in &self.parents {
            writeln!(buffer, "parent {parent}")?;
        }
        writeln!(buffer, "author {}", self.author.display())?;
        writeln!(buffer, "committer {}", self.committer.display())?;
        writeln!(buffer)?;
        buffer.write_all(&self.message)?;

        buffer.finish(&ObjectType::commit())
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.to_framed()?.into_bytes())
    }
}
