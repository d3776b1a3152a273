//! Uploaded image storage port.

use async_trait::async_trait;

/// Which upload area an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Avatar,
    PostImage,
}

impl ImageKind {
    /// Subdirectory below the upload root.
    pub fn directory(self) -> &'static str {
        match self {
            ImageKind::Avatar => "images",
            ImageKind::PostImage => "post_image",
        }
    }

    /// Public URL of a stored file.
    pub fn url_for(self, filename: &str) -> String {
        format!("/static/{}/{}", self.directory(), filename)
    }
}

/// Stores uploaded images under generated names.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` and return the generated file name.
    ///
    /// The name is a random token plus `extension`; callers never choose it.
    async fn save(
        &self,
        kind: ImageKind,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unsupported file extension: {0}")]
    InvalidExtension(String),

    #[error("Failed to write upload: {0}")]
    Io(String),
}
