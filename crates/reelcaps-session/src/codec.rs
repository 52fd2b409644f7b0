//! Base64 payload codec and the registry of decoded blobs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use reelcaps_core::{BlobHandle, SessionError, SessionResult, VIDEO_CONTENT_TYPE};
use std::collections::HashMap;

/// Decoded binary content, tagged with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns base64 payloads into locally addressable blobs.
///
/// Every live handle keeps its decoded bytes in memory until released.
#[derive(Debug, Default)]
pub struct TransferCodec {
    blobs: HashMap<BlobHandle, Blob>,
}

impl TransferCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `payload` and register it under a fresh handle.
    pub fn decode(&mut self, payload: &str) -> SessionResult<BlobHandle> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| SessionError::Decode(format!("Invalid base64 payload: {}", e)))?;

        let handle = BlobHandle::fresh();
        self.blobs.insert(
            handle.clone(),
            Blob {
                bytes: Bytes::from(bytes),
                content_type: VIDEO_CONTENT_TYPE,
            },
        );
        tracing::debug!(handle = %handle, live = self.blobs.len(), "Blob registered");
        Ok(handle)
    }

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    /// Invalidate a handle. Returns false if it was not live.
    pub fn release(&mut self, handle: &BlobHandle) -> bool {
        let released = self.blobs.remove(handle).is_some();
        if released {
            tracing::debug!(handle = %handle, live = self.blobs.len(), "Blob released");
        } else {
            tracing::warn!(handle = %handle, "Release of unknown blob handle");
        }
        released
    }

    pub fn resolve(&self, handle: &BlobHandle) -> Option<&Blob> {
        self.blobs.get(handle)
    }

    pub fn live_handles(&self) -> usize {
        self.blobs.len()
    }

    pub fn release_all(&mut self) {
        self.blobs.clear();
    }
}
