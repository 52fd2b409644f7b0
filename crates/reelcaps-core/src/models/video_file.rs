use bytes::Bytes;
use std::path::Path;

use crate::error::SessionResult;

/// A local video selected for upload.
#[derive(Debug, Clone)]
pub struct VideoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl VideoFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a video from disk, guessing the content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        let content_type = content_type_for(path).to_string();

        Ok(Self::new(file_name, content_type, Bytes::from(data)))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "video/mp4",
    }
}
