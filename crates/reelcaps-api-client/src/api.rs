//! Endpoint methods and wire types for the rendering service.

use crate::ApiClient;
use reelcaps_core::{EngineParameters, SessionError, SessionId, SessionResult, VideoFile};
use serde::{Deserialize, Serialize};

pub const RECEIVE_VIDEO_PATH: &str = "/api/receive-video";
pub const PROCESS_VIDEO_PATH: &str = "/api/process-video";
pub const DELETE_FOLDER_PATH: &str = "/api/delete-folder";

/// Multipart field carrying the uploaded video.
pub const VIDEO_FIELD: &str = "video";

/// Response of `POST /api/receive-video`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub input_video: String,
    pub unique_id: SessionId,
}

/// Response of `POST /api/process-video`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub output_video: String,
    #[serde(default)]
    pub subtitles: Option<String>,
}

/// Body of `POST /api/process-video`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest<'a> {
    pub unique_id: &'a SessionId,
    #[serde(flatten)]
    pub parameters: &'a EngineParameters,
}

/// Body of requests that only name the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest<'a> {
    pub unique_id: &'a SessionId,
}

impl ApiClient {
    /// Upload the raw video; the server answers with a session id and preview.
    pub async fn receive_video(&self, file: &VideoFile) -> SessionResult<UploadResponse> {
        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                SessionError::Config(format!(
                    "Invalid upload content type '{}': {}",
                    file.content_type, e
                ))
            })?;

        let form = reqwest::multipart::Form::new().part(VIDEO_FIELD, part);

        self.post_multipart(RECEIVE_VIDEO_PATH, form).await
    }

    /// Request a render of the session's video with the given style.
    pub async fn process_video(
        &self,
        session_id: &SessionId,
        parameters: &EngineParameters,
    ) -> SessionResult<ProcessResponse> {
        let body = ProcessVideoRequest {
            unique_id: session_id,
            parameters,
        };
        self.post_json(PROCESS_VIDEO_PATH, &body).await
    }

    /// Ask the server to delete the session's working folder.
    pub async fn delete_folder(&self, session_id: &SessionId) -> SessionResult<()> {
        let body = SessionRequest {
            unique_id: session_id,
        };
        self.post_json_no_content(DELETE_FOLDER_PATH, &body).await
    }
}
