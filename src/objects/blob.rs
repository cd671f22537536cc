//! A blob stores file contents verbatim — no filename, no permissions.

use crate::db::ObjectDb;
use crate::error::Result;
use crate::objects::ObjectType;

#[derive(Debug, Clone)]
pub struct Blob {
    pub content: Vec<u8>,
}

impl Blob {
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|e| crate::error::Error::io(path, e))?;
        Ok(Self::new(content))
    }

    pub fn hash(&self, db: &ObjectDb) -> Result<String> {
        db.calculate_key(&self.content, ObjectType::Blob)
    }

    pub fn store(&self, db: &ObjectDb) -> Result<String> {
        db.put(&self.content, ObjectType::Blob)
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn as_text(&self) -> Option<String> {
        String::from_utf8(self.content.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn store_then_hash_agree() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("objects")).unwrap();
        let db = ObjectDb::new(dir.path().to_path_buf());
        let blob = Blob::new(b"hello world\n".to_vec());
        let hash = blob.hash(&db).unwrap();
        let stored = blob.store(&db).unwrap();
        assert_eq!(hash, stored);
    }

    #[test]
    fn as_text_rejects_binary() {
        let binary_blob = Blob::new(vec![0xFF, 0xFE, 0x00]);
        assert!(binary_blob.as_text().is_none());
        let text_blob = Blob::new(b"hi".to_vec());
        assert_eq!(text_blob.as_text(), Some("hi".to_string()));
    }
}
