//! Multipart form reading.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;

use bloghaven_core::ports::{ImageKind, ImageStore};
use bloghaven_core::validation::file_extension;

use crate::middleware::error::{AppError, AppResult};

/// A file part with a non-empty file name.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as sent by the client. Only its extension is ever used.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// All parts of one multipart submission.
#[derive(Debug, Default)]
pub struct MultipartFields {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartFields {
    /// Drain `payload`, failing once more than `limit` bytes have been read.
    pub async fn read(mut payload: Multipart, limit: usize) -> AppResult<Self> {
        let mut fields = Self::default();
        let mut total = 0usize;

        while let Some(mut field) = payload.try_next().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                total += chunk.len();
                if total > limit {
                    tracing::warn!(limit, "Multipart submission too large");
                    return Err(AppError::PayloadTooLarge(limit));
                }
                bytes.extend_from_slice(&chunk);
            }

            match filename {
                // Browsers send an empty file part when nothing was chosen.
                Some(filename) if filename.is_empty() => {}
                Some(filename) => {
                    tracing::debug!(field = %name, %filename, size = bytes.len(), "Received upload");
                    fields.files.insert(name, UploadedFile { filename, bytes });
                }
                None => {
                    let text = String::from_utf8(bytes)
                        .map_err(|_| AppError::BadRequest(format!("Field {} is not UTF-8", name)))?;
                    fields.texts.insert(name, text);
                }
            }
        }

        Ok(fields)
    }

    /// Text value of `name`, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.texts.get(name).cloned().unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Save `file` under a generated name and return that name.
pub async fn store_upload(
    images: &dyn ImageStore,
    kind: ImageKind,
    file: &UploadedFile,
) -> AppResult<String> {
    let extension = file_extension(&file.filename)
        .ok_or_else(|| AppError::BadRequest(format!("{} has no extension", file.filename)))?;
    let stored = images.save(kind, &extension, &file.bytes).await?;
    tracing::info!(kind = kind.directory(), %stored, "Stored uploaded image");
    Ok(stored)
}
