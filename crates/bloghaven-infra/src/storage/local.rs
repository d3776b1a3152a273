//! Local-filesystem image store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;

use bloghaven_core::ports::{ImageKind, ImageStore, StorageError};
use bloghaven_core::validation::ALLOWED_IMAGE_EXTENSIONS;

/// Random bytes per generated file name (16 hex characters).
const TOKEN_BYTES: usize = 8;

/// Writes uploads below `root/<kind directory>/` under random names.
///
/// Files are never removed; replacing an avatar or deleting a post leaves
/// the old file in place.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path a stored file name resolves to.
    pub fn path_for(&self, kind: ImageKind, filename: &str) -> PathBuf {
        self.root.join(kind.directory()).join(filename)
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(
        &self,
        kind: ImageKind,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StorageError::InvalidExtension(extension));
        }

        let filename = format!("{}.{}", random_token(), extension);
        let dir = self.root.join(kind.directory());

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::write(dir.join(&filename), bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(kind = ?kind, %filename, size = bytes.len(), "Stored upload");
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalImageStore {
        LocalImageStore::new(std::env::temp_dir().join(format!("bloghaven-{}", uuid::Uuid::new_v4())))
    }

    #[test]
    fn test_random_token_is_16_hex_chars() {
        let token = random_token();
        assert_eq!(token.len(), 16);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, random_token());
    }

    #[tokio::test]
    async fn test_save_writes_under_kind_directory() {
        let store = temp_store();

        let name = store
            .save(ImageKind::PostImage, "PNG", b"\x89PNG")
            .await
            .unwrap();

        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 16 + 4);
        let written = tokio::fs::read(store.path_for(ImageKind::PostImage, &name))
            .await
            .unwrap();
        assert_eq!(written, b"\x89PNG");

        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_other_extensions() {
        let store = temp_store();
        let result = store.save(ImageKind::Avatar, "exe", b"MZ").await;
        assert!(matches!(result, Err(StorageError::InvalidExtension(_))));
    }
}
