//! Remote calls made on behalf of a session.

use crate::api::{ProcessResponse, UploadResponse};
use crate::ApiClient;
use async_trait::async_trait;
use reelcaps_core::{EngineParameters, SessionId, SessionResult, VideoFile};

/// The three remote operations a session needs.
///
/// None of them retry. `cleanup` is best-effort and never fails: it runs while
/// the session is being torn down, when nobody is left to report to.
#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    async fn upload(&self, file: &VideoFile) -> SessionResult<UploadResponse>;

    async fn process(
        &self,
        session_id: &SessionId,
        parameters: &EngineParameters,
    ) -> SessionResult<ProcessResponse>;

    async fn cleanup(&self, session_id: &SessionId);
}

#[async_trait]
impl RequestDispatcher for ApiClient {
    async fn upload(&self, file: &VideoFile) -> SessionResult<UploadResponse> {
        tracing::debug!(file_name = %file.file_name, size = file.size(), "Uploading video");
        let response = self.receive_video(file).await?;
        tracing::info!(session_id = %response.unique_id, "Video received by server");
        Ok(response)
    }

    async fn process(
        &self,
        session_id: &SessionId,
        parameters: &EngineParameters,
    ) -> SessionResult<ProcessResponse> {
        tracing::debug!(session_id = %session_id, font = %parameters.font, "Requesting render");
        self.process_video(session_id, parameters).await
    }

    async fn cleanup(&self, session_id: &SessionId) {
        match self.delete_folder(session_id).await {
            Ok(()) => tracing::debug!(session_id = %session_id, "Session folder deleted"),
            Err(e) => tracing::warn!(
                session_id = %session_id,
                error = %e,
                "Session cleanup failed"
            ),
        }
    }
}
