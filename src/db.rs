//! The object database: a hash-keyed, compressed, typed blob store.
//!
//! Objects live at `R/objects/<k[0:2]>/<k[2:]>`. The stored bytes are
//! `"<type> <size>\0<payload>"` compressed with DEFLATE; the key is the
//! SHA-1 hex digest of the *compressed* bytes, not the logical payload. That
//! is a deliberate property of this format, not an oversight: it means the
//! fingerprint identifies exactly what is on disk.

use std::io::{Read, Write};
use std::path::PathBuf;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::hasher::{Hasher, Sha1Hasher};
use crate::objects::ObjectType;

/// A decoded stored object: its type tag, declared size, and raw payload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub object_type: ObjectType,
    pub size: usize,
    pub payload: Vec<u8>,
}

impl StoredObject {
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.payload.clone())
            .map_err(|_| Error::Corrupt("object payload is not valid UTF-8".to_string()))
    }
}

pub struct ObjectDb {
    root: PathBuf,
    hasher: Box<dyn Hasher + Send + Sync>,
}

impl ObjectDb {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            hasher: Box::new(Sha1Hasher),
        }
    }

    pub fn with_hasher(root: PathBuf, hasher: Box<dyn Hasher + Send + Sync>) -> Self {
        Self { root, hasher }
    }

    fn shard_dir(&self, key: &str) -> PathBuf {
        self.root.join("objects").join(&key[0..2])
    }

    fn shard_path(&self, key: &str) -> PathBuf {
        self.shard_dir(key).join(&key[2..])
    }

    fn wrap(object_type: ObjectType, content: &[u8]) -> Vec<u8> {
        let mut wrapped = Vec::with_capacity(content.len() + 16);
        wrapped.extend_from_slice(object_type.as_str().as_bytes());
        wrapped.push(b' ');
        wrapped.extend_from_slice(content.len().to_string().as_bytes());
        wrapped.push(0);
        wrapped.extend_from_slice(content);
        wrapped
    }

    fn compress(raw: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(raw)
            .map_err(|e| Error::io("<compress>", e))?;
        encoder.finish().map_err(|e| Error::io("<compress>", e))
    }

    fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(compressed);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|_| Error::Corrupt("object is not valid zlib data".to_string()))?;
        Ok(out)
    }

    /// Compute the key `put(content, object_type)` would produce, without
    /// writing anything.
    pub fn calculate_key(&self, content: &[u8], object_type: ObjectType) -> Result<String> {
        let wrapped = Self::wrap(object_type, content);
        let compressed = Self::compress(&wrapped)?;
        Ok(self.hasher.hash(&compressed))
    }

    /// Store `content` as an object of `object_type`, returning its key.
    /// Writing is skipped (and the existing key returned) if an object with
    /// that key already exists.
    pub fn put(&self, content: &[u8], object_type: ObjectType) -> Result<String> {
        let wrapped = Self::wrap(object_type, content);
        let compressed = Self::compress(&wrapped)?;
        let key = self.hasher.hash(&compressed);

        let path = self.shard_path(&key);
        if path.exists() {
            log::debug!("object {key} already present, skipping write");
            return Ok(key);
        }

        let dir = self.shard_dir(&key);
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        std::fs::write(&path, &compressed).map_err(|e| Error::io(&path, e))?;
        log::debug!("stored {object_type} object {key}");
        Ok(key)
    }

    pub fn put_text(&self, content: &str, object_type: ObjectType) -> Result<String> {
        self.put(content.as_bytes(), object_type)
    }

    /// Resolve `prefix` (≥ 4 hex chars) to the single matching object file,
    /// failing `NotFound` on zero or more than one match.
    fn resolve(&self, prefix: &str) -> Result<PathBuf> {
        if prefix.len() < 4 {
            return Err(Error::NotFound(prefix.to_string()));
        }
        let dir = self.shard_dir(prefix);
        let pattern = format!(
            "{}/{}*",
            dir.display(),
            glob::Pattern::escape(&prefix[2..])
        );
        let matches: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|_| Error::NotFound(prefix.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        match matches.len() {
            1 => Ok(matches.into_iter().next().unwrap()),
            0 => Err(Error::NotFound(prefix.to_string())),
            _ => Err(Error::NotFound(prefix.to_string())),
        }
    }

    /// Retrieve the object whose key matches the given full or prefix key.
    pub fn get(&self, key: &str) -> Result<StoredObject> {
        if key.is_empty() {
            return Err(Error::NotFound(key.to_string()));
        }
        let path = self.resolve(key)?;
        let compressed = std::fs::read(&path).map_err(|e| Error::io(&path, e))?;
        let raw = Self::decompress(&compressed)?;

        let space = raw
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| Error::Corrupt(format!("object {key} missing type separator")))?;
        let object_type = ObjectType::parse(std::str::from_utf8(&raw[..space]).unwrap_or(""))
            .ok_or_else(|| Error::Corrupt(format!("object {key} has unknown type")))?;

        let nul = raw[space + 1..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Corrupt(format!("object {key} missing header terminator")))?
            + space
            + 1;
        let size: usize = std::str::from_utf8(&raw[space + 1..nul])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Corrupt(format!("object {key} has invalid size header")))?;

        let payload = raw[nul + 1..].to_vec();
        if payload.len() != size {
            return Err(Error::Corrupt(format!(
                "object {key} declared size {size} but has {} bytes",
                payload.len()
            )));
        }

        Ok(StoredObject {
            object_type,
            size,
            payload,
        })
    }

    /// Resolve a prefix to its full 40-char key.
    pub fn get_full_key(&self, prefix: &str) -> Result<String> {
        let path = self.resolve(prefix)?;
        let dir_name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("");
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        Ok(format!("{dir_name}{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_db() -> (tempfile::TempDir, ObjectDb) {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("objects")).unwrap();
        let db = ObjectDb::new(dir.path().to_path_buf());
        (dir, db)
    }

    #[test]
    fn put_then_get_roundtrips() {
        let (_tmp, db) = new_db();
        let key = db.put(b"hello", ObjectType::Blob).unwrap();
        let obj = db.get(&key).unwrap();
        assert_eq!(obj.payload, b"hello");
        assert_eq!(obj.object_type, ObjectType::Blob);
    }

    #[test]
    fn calculate_key_matches_put() {
        let (_tmp, db) = new_db();
        let calculated = db.calculate_key(b"abc", ObjectType::Blob).unwrap();
        let put_key = db.put(b"abc", ObjectType::Blob).unwrap();
        assert_eq!(calculated, put_key);
    }

    #[test]
    fn put_is_idempotent() {
        let (_tmp, db) = new_db();
        let k1 = db.put(b"same", ObjectType::Blob).unwrap();
        let k2 = db.put(b"same", ObjectType::Blob).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn get_full_key_from_prefix() {
        let (_tmp, db) = new_db();
        let key = db.put(b"prefix test", ObjectType::Blob).unwrap();
        let full = db.get_full_key(&key[..6]).unwrap();
        assert_eq!(full, key);
    }

    #[test]
    fn get_too_short_key_fails() {
        let (_tmp, db) = new_db();
        assert!(matches!(db.get("abc"), Err(Error::NotFound(_))));
    }

    #[test]
    fn get_empty_key_fails() {
        let (_tmp, db) = new_db();
        assert!(matches!(db.get(""), Err(Error::NotFound(_))));
    }

    #[test]
    fn get_unknown_key_fails() {
        let (_tmp, db) = new_db();
        assert!(matches!(db.get("0123456789abcdef"), Err(Error::NotFound(_))));
    }
}
