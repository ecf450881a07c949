//! File attachments

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },
    #[error("{} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// A single file picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// Build an attachment from memory, guessing the MIME type from the name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk, refusing anything larger than `max_bytes`
    pub async fn load(path: &Path, max_bytes: u64) -> Result<Self, AttachmentError> {
        let io_err = |source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        if metadata.len() > max_bytes {
            return Err(AttachmentError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: max_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(io_err)?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        tracing::debug!(file = %file_name, size = bytes.len(), "Loaded attachment");
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
