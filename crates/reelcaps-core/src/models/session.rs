use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Content type of every decoded payload.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Server-assigned identifier of a working session (`unique_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Dereferenceable URL of a decoded blob, e.g. `blob:reelcaps/<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobHandle(String);

impl BlobHandle {
    const SCHEME: &'static str = "blob:reelcaps/";

    /// A handle that has never been issued before.
    pub fn fresh() -> Self {
        Self(format!("{}{}", Self::SCHEME, Uuid::new_v4()))
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl Display for BlobHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Binary payload as received, plus the local handle derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryAsset {
    encoded_payload: String,
    local_handle: Option<BlobHandle>,
}

impl BinaryAsset {
    pub fn new(encoded_payload: String, local_handle: BlobHandle) -> Self {
        Self {
            encoded_payload,
            local_handle: Some(local_handle),
        }
    }

    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    /// `None` once the handle has been released.
    pub fn local_handle(&self) -> Option<&BlobHandle> {
        self.local_handle.as_ref()
    }

    /// Detach the handle so the caller can release it.
    pub fn take_handle(&mut self) -> Option<BlobHandle> {
        self.local_handle.take()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub session_id: Option<SessionId>,
    pub input_asset: Option<BinaryAsset>,
    pub output_asset: Option<BinaryAsset>,
}

impl Session {
    /// The asset currently shown: the latest render, else the uploaded input.
    pub fn displayed_asset(&self) -> Option<&BinaryAsset> {
        self.output_asset.as_ref().or(self.input_asset.as_ref())
    }

    pub fn displayed_asset_mut(&mut self) -> Option<&mut BinaryAsset> {
        if self.output_asset.is_some() {
            self.output_asset.as_mut()
        } else {
            self.input_asset.as_mut()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_handles_are_unique() {
        let a = BlobHandle::fresh();
        let b = BlobHandle::fresh();
        assert_ne!(a, b);
        assert!(a.url().starts_with("blob:reelcaps/"));
    }

    #[test]
    fn displayed_asset_prefers_output() {
        let mut session = Session::default();
        assert!(session.displayed_asset().is_none());

        session.input_asset = Some(BinaryAsset::new("aW4=".into(), BlobHandle::fresh()));
        assert_eq!(session.displayed_asset().unwrap().encoded_payload(), "aW4=");

        session.output_asset = Some(BinaryAsset::new("b3V0".into(), BlobHandle::fresh()));
        assert_eq!(session.displayed_asset().unwrap().encoded_payload(), "b3V0");
    }

    #[test]
    fn take_handle_leaves_payload() {
        let handle = BlobHandle::fresh();
        let mut asset = BinaryAsset::new("aW4=".into(), handle.clone());
        assert_eq!(asset.take_handle(), Some(handle));
        assert!(asset.local_handle().is_none());
        assert!(asset.take_handle().is_none());
        assert_eq!(asset.encoded_payload(), "aW4=");
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let id = SessionId::new("3f2b");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3f2b\"");
    }
}
