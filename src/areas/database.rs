//! Content-addressed object store
//!
//! Objects live at `<root>/<xx>/<remaining 38 hex chars>` where `xx` is the
//! first byte of the digest, and are zlib-compressed on disk. The root is
//! resolved lazily, once per `Database`.

use crate::areas::config;
use crate::artifacts::objects::object::{self, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::cell::OnceCell;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    /// Repository directory the root is resolved against
    base: Box<Path>,
    root: OnceCell<Box<Path>>,
}

impl Database {
    /// Store whose root is resolved from the environment on first use
    pub fn new(base: Box<Path>) -> Self {
        Database {
            base,
            root: OnceCell::new(),
        }
    }

    /// Store pinned to an explicit root directory
    pub fn at(root: Box<Path>) -> Self {
        Database {
            base: root.clone(),
            root: OnceCell::from(root),
        }
    }

    pub fn objects_path(&self) -> &Path {
        self.root.get_or_init(|| {
            let root = config::resolve_objects_root(&self.base);
            tracing::debug!(root = %root.display(), "resolved object store root");
            root.into_boxed_path()
        })
    }

    /// Path of the file holding `object_id`
    pub fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.objects_path().join(object_id.to_path())
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Digest an object without storing it
    pub fn hash_object(object_type: &ObjectType, payload: &[u8]) -> ObjectId {
        ObjectId::hash(&object::frame(object_type, payload))
    }

    /// Read an object back as its type tag and payload
    pub fn load(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(object_id);
        let object_content = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(*object_id));
            }
            Err(e) => return Err(e.into()),
        };

        let object_content = Self::decompress(&object_content)?;
        let (object_type, payload_start) = object::parse_header(&object_content)?;

        Ok((object_type, object_content.slice(payload_start..)))
    }

    /// Frame, digest and persist a payload
    pub fn store(&self, object_type: &ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let framed = object::frame(object_type, payload);
        let object_id = ObjectId::hash(&framed);

        self.persist(&object_id, &framed)?;
        Ok(object_id)
    }

    /// Persist an already framed object
    ///
    /// The header is validated before anything is written.
    pub fn store_framed(&self, framed: &[u8]) -> Result<ObjectId> {
        object::parse_header(framed)?;
        let object_id = ObjectId::hash(framed);

        self.persist(&object_id, framed)?;
        Ok(object_id)
    }

    pub fn store_object(&self, object: &impl Packable) -> Result<ObjectId> {
        self.store_framed(&object.serialize()?)
    }

    fn persist(&self, object_id: &ObjectId, framed: &[u8]) -> Result<()> {
        let object_path = self.object_path(object_id);

        // an object is never rewritten, only checked against its name
        if object_path.exists() {
            let existing = Self::decompress(&std::fs::read(&object_path)?)?;
            if ObjectId::hash(&existing) != *object_id {
                return Err(Error::CorruptObject(format!(
                    "stored object {object_id} does not hash to its name"
                )));
            }

            tracing::debug!(%object_id, "object already present");
            return Ok(());
        }

        let object_dir = object_path.parent().ok_or_else(|| {
            Error::MalformedInput(format!("invalid object path {}", object_path.display()))
        })?;
        std::fs::create_dir_all(object_dir)?;

        self.write_object(object_dir, &object_path, framed)?;
        tracing::debug!(%object_id, path = %object_path.display(), "stored object");

        Ok(())
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, framed: &[u8]) -> Result<()> {
        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let object_content = Self::compress(framed)?;

        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .and_then(|mut file| file.write_all(&object_content))
            // rename the temp file to the object file to make it atomic
            .and_then(|_| std::fs::rename(&temp_object_path, object_path));

        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
        encoder.write_all(data)?;

        Ok(encoder.finish()?)
    }

    fn decompress(data: &[u8]) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|e| Error::CorruptObject(format!("unable to decompress object: {e}")))?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
