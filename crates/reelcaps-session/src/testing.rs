//! In-memory dispatcher for unit tests.

use crate::codec::TransferCodec;
use crate::orchestrator::SessionState;
use async_trait::async_trait;
use reelcaps_api_client::{ProcessResponse, RequestDispatcher, UploadResponse};
use reelcaps_core::{EngineParameters, SessionId, SessionResult, VideoFile};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::watch;

#[derive(Default)]
pub struct FakeDispatcher {
    upload_results: Mutex<VecDeque<SessionResult<UploadResponse>>>,
    process_results: Mutex<VecDeque<SessionResult<ProcessResponse>>>,
    uploads: Mutex<Vec<String>>,
    processes: Mutex<Vec<(SessionId, EngineParameters)>>,
    cleanups: Mutex<Vec<SessionId>>,
    observed_states: Mutex<Vec<SessionState>>,
    state_rx: Mutex<Option<watch::Receiver<SessionState>>>,
}

impl FakeDispatcher {
    pub fn push_upload(&self, result: SessionResult<UploadResponse>) {
        self.upload_results.lock().unwrap().push_back(result);
    }

    pub fn push_process(&self, result: SessionResult<ProcessResponse>) {
        self.process_results.lock().unwrap().push_back(result);
    }

    /// Record the orchestrator state seen while each request is in flight.
    pub fn observe(&self, rx: watch::Receiver<SessionState>) {
        *self.state_rx.lock().unwrap() = Some(rx);
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn processes(&self) -> Vec<(SessionId, EngineParameters)> {
        self.processes.lock().unwrap().clone()
    }

    pub fn cleanups(&self) -> Vec<SessionId> {
        self.cleanups.lock().unwrap().clone()
    }

    pub fn observed_states(&self) -> Vec<SessionState> {
        self.observed_states.lock().unwrap().clone()
    }

    fn record_state(&self) {
        if let Some(rx) = self.state_rx.lock().unwrap().as_ref() {
            let state = *rx.borrow();
            self.observed_states.lock().unwrap().push(state);
        }
    }
}

pub fn upload_ok(id: &str, bytes: &[u8]) -> SessionResult<UploadResponse> {
    Ok(UploadResponse {
        input_video: TransferCodec::encode(bytes),
        unique_id: SessionId::new(id),
    })
}

pub fn process_ok(bytes: &[u8], subtitles: Option<&str>) -> SessionResult<ProcessResponse> {
    Ok(ProcessResponse {
        output_video: TransferCodec::encode(bytes),
        subtitles: subtitles.map(str::to_string),
    })
}

#[async_trait]
impl RequestDispatcher for FakeDispatcher {
    async fn upload(&self, file: &VideoFile) -> SessionResult<UploadResponse> {
        self.record_state();
        self.uploads.lock().unwrap().push(file.file_name.clone());
        let next = self.upload_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| upload_ok("fake-session", b"input"))
    }

    async fn process(
        &self,
        session_id: &SessionId,
        parameters: &EngineParameters,
    ) -> SessionResult<ProcessResponse> {
        self.record_state();
        self.processes
            .lock()
            .unwrap()
            .push((session_id.clone(), parameters.clone()));
        let next = self.process_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| process_ok(b"output", None))
    }

    async fn cleanup(&self, session_id: &SessionId) {
        self.cleanups.lock().unwrap().push(session_id.clone());
    }
}
