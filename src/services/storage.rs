use anyhow::{Result, anyhow};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk document store. Files land under `<root>/<employee_id>/`,
/// prefixed with an upload timestamp so repeated names never collide.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

pub struct StoredFile {
    /// Path relative to the store root, recorded in the database.
    pub relative_path: String,
    pub size_bytes: i64,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn save(
        &self,
        employee_id: Uuid,
        file_name: &str,
        content_base64: &str,
    ) -> Result<StoredFile> {
        let file_name = sanitize_file_name(file_name)?;
        let bytes = STANDARD
            .decode(content_base64)
            .map_err(|e| anyhow!("Invalid base64 content: {e}"))?;

        let dir = self.root.join(employee_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}_{}", Utc::now().timestamp_millis(), file_name);
        let path = dir.join(&stored_name);
        tokio::fs::write(&path, &bytes).await?;

        Ok(StoredFile {
            relative_path: format!("{employee_id}/{stored_name}"),
            size_bytes: bytes.len() as i64,
        })
    }

    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative_path)?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(bytes)
    }

    pub async fn remove(&self, relative_path: &str) -> Result<()> {
        let path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // The database row is the source of truth; a missing file is fine.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = Path::new(relative_path);
        if relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(anyhow!("Invalid stored path: {relative_path}"));
        }
        Ok(self.root.join(relative))
    }
}

fn sanitize_file_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.len() > 255 {
        return Err(anyhow!("Invalid file name"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") || name.contains('\0') {
        return Err(anyhow!("Invalid file name: {name}"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal_names() {
        assert!(sanitize_file_name("../secrets.txt").is_err());
        assert!(sanitize_file_name("a/b.txt").is_err());
        assert!(sanitize_file_name("a\\b.txt").is_err());
        assert!(sanitize_file_name("").is_err());
    }

    #[test]
    fn accepts_plain_names() {
        assert_eq!(sanitize_file_name(" cv.pdf ").unwrap(), "cv.pdf");
        assert_eq!(sanitize_file_name("offer letter.docx").unwrap(), "offer letter.docx");
    }

    #[tokio::test]
    async fn saves_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        let employee_id = Uuid::new_v4();

        let encoded = STANDARD.encode(b"hello");
        let stored = store.save(employee_id, "note.txt", &encoded).await.unwrap();

        assert_eq!(stored.size_bytes, 5);
        assert!(stored.relative_path.starts_with(&employee_id.to_string()));

        let bytes = store.read(&stored.relative_path).await.unwrap();
        assert_eq!(bytes, b"hello");

        store.remove(&stored.relative_path).await.unwrap();
        assert!(store.read(&stored.relative_path).await.is_err());
    }

    #[tokio::test]
    async fn rejects_traversal_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(store.read("../etc/passwd").await.is_err());
    }
}
