//! Session state machine: upload, configure, submit, display.

use crate::codec::{Blob, TransferCodec};
use crate::lifecycle::SessionLifecycle;
use reelcaps_api_client::{ApiClient, RequestDispatcher};
use reelcaps_core::{
    BinaryAsset, ClientConfig, LogLevel, Session, SessionError, SessionResult, StyleConfigStore,
    SubtitleTrack, VideoFile,
};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file accepted yet.
    Idle,
    Uploading,
    /// Session id and input asset known; style editable.
    Ready,
    Submitting,
}

impl SessionState {
    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Uploading | SessionState::Submitting)
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Uploading => write!(f, "uploading"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Submitting => write!(f, "submitting"),
        }
    }
}

/// Why a transition request was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotIdle(SessionState),
    NotReady(SessionState),
    FontNotSelected,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

/// Last failure surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub operation: &'static str,
    pub code: &'static str,
    pub message: String,
    pub recoverable: bool,
}

pub struct SessionOrchestrator {
    dispatcher: Arc<dyn RequestDispatcher>,
    codec: TransferCodec,
    style: StyleConfigStore,
    lifecycle: SessionLifecycle,
    session: Session,
    subtitles: Option<SubtitleTrack>,
    last_error: Option<FailureReport>,
    max_upload_bytes: u64,
    state_tx: watch::Sender<SessionState>,
}

impl SessionOrchestrator {
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>, max_upload_bytes: u64) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            dispatcher,
            codec: TransferCodec::new(),
            style: StyleConfigStore::new(),
            lifecycle: SessionLifecycle::new(),
            session: Session::default(),
            subtitles: None,
            last_error: None,
            max_upload_bytes,
            state_tx,
        }
    }

    /// Orchestrator talking HTTP to the service described by `config`.
    pub fn from_config(config: &ClientConfig) -> SessionResult<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.max_upload_bytes))
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Watch state changes, e.g. to show a progress indicator.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn style(&self) -> &StyleConfigStore {
        &self.style
    }

    /// Style controls are only usable once a session exists.
    pub fn style_editable(&self) -> bool {
        self.session.session_id.is_some()
    }

    pub fn style_mut(&mut self) -> Option<&mut StyleConfigStore> {
        if self.style_editable() {
            Some(&mut self.style)
        } else {
            None
        }
    }

    pub fn displayed_asset(&self) -> Option<&BinaryAsset> {
        self.session.displayed_asset()
    }

    /// Decoded content behind the displayed asset's handle.
    pub fn displayed_blob(&self) -> Option<&Blob> {
        let handle = self.session.displayed_asset()?.local_handle()?;
        self.codec.resolve(handle)
    }

    pub fn subtitles(&self) -> Option<&SubtitleTrack> {
        self.subtitles.as_ref()
    }

    pub fn last_error(&self) -> Option<&FailureReport> {
        self.last_error.as_ref()
    }

    pub fn live_handles(&self) -> usize {
        self.codec.live_handles()
    }

    /// Accept a file and upload it. Only acts from `Idle`.
    pub async fn select_file(&mut self, file: VideoFile) -> SessionResult<Outcome> {
        if self.lifecycle.is_torn_down() {
            return Ok(self.ignore("select_file", IgnoreReason::TornDown));
        }
        let state = self.state();
        if state != SessionState::Idle {
            return Ok(self.ignore("select_file", IgnoreReason::NotIdle(state)));
        }

        if file.size() > self.max_upload_bytes {
            let err = SessionError::FileTooLarge {
                size: file.size(),
                limit: self.max_upload_bytes,
            };
            self.report("receive-video", &err);
            return Err(err);
        }

        self.set_state(SessionState::Uploading);
        let result = self.dispatcher.upload(&file).await;

        let decoded = result.and_then(|response| {
            let handle = self.codec.decode(&response.input_video)?;
            Ok((response, handle))
        });

        match decoded {
            Ok((response, handle)) => {
                tracing::info!(
                    session_id = %response.unique_id,
                    file_name = %file.file_name,
                    "Upload complete"
                );
                self.lifecycle.assign(response.unique_id.clone());
                self.session.session_id = Some(response.unique_id);
                self.session.input_asset = Some(BinaryAsset::new(response.input_video, handle));
                self.last_error = None;
                self.set_state(SessionState::Ready);
                Ok(Outcome::Applied)
            }
            Err(err) => {
                self.report("receive-video", &err);
                self.set_state(SessionState::Idle);
                Err(err)
            }
        }
    }

    /// Submit the current style for rendering. Only acts from `Ready` with a font.
    pub async fn submit(&mut self) -> SessionResult<Outcome> {
        if self.lifecycle.is_torn_down() {
            return Ok(self.ignore("submit", IgnoreReason::TornDown));
        }
        let state = self.state();
        if state != SessionState::Ready {
            return Ok(self.ignore("submit", IgnoreReason::NotReady(state)));
        }

        let Some(parameters) = self.style.to_engine_parameters() else {
            return Ok(self.ignore("submit", IgnoreReason::FontNotSelected));
        };

        let Some(session_id) = self.session.session_id.clone() else {
            let err = SessionError::MissingSession {
                operation: "process-video",
            };
            self.report("process-video", &err);
            return Err(err);
        };

        self.set_state(SessionState::Submitting);
        let result = self.dispatcher.process(&session_id, &parameters).await;

        let decoded = result.and_then(|response| {
            let handle = self.codec.decode(&response.output_video)?;
            Ok((response, handle))
        });

        match decoded {
            Ok((response, handle)) => {
                self.replace_displayed(BinaryAsset::new(response.output_video, handle));
                self.subtitles = response.subtitles.as_deref().and_then(|raw| {
                    SubtitleTrack::parse(raw)
                        .map_err(|e| {
                            tracing::warn!(session_id = %session_id, error = %e, "Ignoring unreadable subtitles")
                        })
                        .ok()
                });
                tracing::info!(
                    session_id = %session_id,
                    font = %parameters.font,
                    cues = self.subtitles.as_ref().map_or(0, |s| s.cues().len()),
                    "Render complete"
                );
                self.last_error = None;
                self.set_state(SessionState::Ready);
                Ok(Outcome::Applied)
            }
            Err(err) => {
                self.report("process-video", &err);
                self.set_state(SessionState::Ready);
                Err(err)
            }
        }
    }

    /// End the session: fire the cleanup request and free decoded blobs.
    ///
    /// The returned task can be awaited by callers that want to give the
    /// request a chance to leave before exit; the orchestrator never does.
    pub fn teardown(&mut self) -> Option<JoinHandle<()>> {
        let task = self.lifecycle.teardown(&self.dispatcher);
        for asset in [
            self.session.input_asset.as_mut(),
            self.session.output_asset.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            asset.take_handle();
        }
        self.codec.release_all();
        task
    }

    fn replace_displayed(&mut self, asset: BinaryAsset) {
        if let Some(previous) = self.session.displayed_asset_mut() {
            if let Some(handle) = previous.take_handle() {
                self.codec.release(&handle);
            }
        }
        self.session.output_asset = Some(asset);
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state_tx.send_replace(state);
        tracing::debug!(from = %previous, to = %state, "Session state changed");
    }

    fn ignore(&self, operation: &'static str, reason: IgnoreReason) -> Outcome {
        tracing::warn!(operation, reason = ?reason, "Ignoring request");
        Outcome::Ignored(reason)
    }

    fn report(&mut self, operation: &'static str, err: &SessionError) {
        let details = err.detailed_message();
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(operation, code = err.error_code(), "{}", details),
            LogLevel::Warn => tracing::warn!(operation, code = err.error_code(), "{}", details),
            LogLevel::Error => tracing::error!(operation, code = err.error_code(), "{}", details),
        }
        self.last_error = Some(FailureReport {
            operation,
            code: err.error_code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        });
    }
}

impl Drop for SessionOrchestrator {
    fn drop(&mut self) {
        // Detached: the runtime finishes the request if it is still alive.
        let _ = self.lifecycle.teardown(&self.dispatcher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{process_ok, upload_ok, FakeDispatcher};
    use bytes::Bytes;
    use reelcaps_core::{FontFile, LetterSpacing, SessionId};

    const MIB: usize = 1024 * 1024;

    fn video_of(size: usize) -> VideoFile {
        VideoFile::new("clip.mp4", "video/mp4", Bytes::from(vec![7u8; size]))
    }

    fn orchestrator() -> (Arc<FakeDispatcher>, SessionOrchestrator) {
        let fake = Arc::new(FakeDispatcher::default());
        let orchestrator = SessionOrchestrator::new(fake.clone(), DEFAULT_MAX_UPLOAD_BYTES);
        fake.observe(orchestrator.subscribe());
        (fake, orchestrator)
    }

    async fn ready_orchestrator() -> (Arc<FakeDispatcher>, SessionOrchestrator) {
        let (fake, mut orchestrator) = orchestrator();
        fake.push_upload(upload_ok("session-1", b"input bytes"));
        orchestrator.select_file(video_of(1024)).await.unwrap();
        (fake, orchestrator)
    }

    #[tokio::test]
    async fn upload_moves_idle_to_ready() {
        let (fake, mut orchestrator) = orchestrator();
        fake.push_upload(upload_ok("session-1", b"input bytes"));
        assert_eq!(orchestrator.state(), SessionState::Idle);
        assert!(!orchestrator.style_editable());

        let outcome = orchestrator.select_file(video_of(5 * MIB)).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(fake.observed_states(), vec![SessionState::Uploading]);
        assert_eq!(orchestrator.state(), SessionState::Ready);
        assert_eq!(
            orchestrator.session().session_id,
            Some(SessionId::new("session-1"))
        );
        assert_eq!(
            orchestrator.displayed_blob().unwrap().bytes.as_ref(),
            b"input bytes"
        );
        assert!(orchestrator.style_editable());
        assert!(orchestrator.style_mut().is_some());
        assert_eq!(orchestrator.live_handles(), 1);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_without_request() {
        let (fake, mut orchestrator) = orchestrator();

        let err = orchestrator
            .select_file(video_of(12 * MIB))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::FileTooLarge { .. }));
        assert!(fake.uploads().is_empty());
        assert_eq!(orchestrator.state(), SessionState::Idle);
        assert_eq!(orchestrator.last_error().unwrap().code, "FILE_TOO_LARGE");
        assert!(orchestrator.session().session_id.is_none());
    }

    #[tokio::test]
    async fn exactly_ten_mib_is_accepted() {
        let (fake, mut orchestrator) = orchestrator();
        orchestrator.select_file(video_of(10 * MIB)).await.unwrap();
        assert_eq!(fake.uploads().len(), 1);
    }

    #[tokio::test]
    async fn failed_upload_stays_idle_and_can_retry() {
        let (fake, mut orchestrator) = orchestrator();
        fake.push_upload(Err(SessionError::Remote {
            status: 502,
            body: "bad gateway".into(),
        }));

        assert!(orchestrator.select_file(video_of(1024)).await.is_err());
        assert_eq!(orchestrator.state(), SessionState::Idle);
        assert!(orchestrator.session().session_id.is_none());
        assert!(orchestrator.style_mut().is_none());
        assert_eq!(orchestrator.last_error().unwrap().operation, "receive-video");

        fake.push_upload(upload_ok("session-2", b"x"));
        orchestrator.select_file(video_of(1024)).await.unwrap();
        assert_eq!(orchestrator.state(), SessionState::Ready);
        assert!(orchestrator.last_error().is_none());
    }

    #[tokio::test]
    async fn undecodable_upload_payload_stays_idle() {
        let (fake, mut orchestrator) = orchestrator();
        fake.push_upload(Ok(reelcaps_api_client::UploadResponse {
            input_video: "%%%".into(),
            unique_id: SessionId::new("s"),
        }));

        let err = orchestrator.select_file(video_of(10)).await.unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");
        assert_eq!(orchestrator.state(), SessionState::Idle);
        assert!(orchestrator.session().session_id.is_none());
    }

    #[tokio::test]
    async fn select_file_ignored_once_ready() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        let outcome = orchestrator.select_file(video_of(10)).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Ignored(IgnoreReason::NotIdle(SessionState::Ready))
        );
        assert_eq!(fake.uploads().len(), 1);
    }

    #[tokio::test]
    async fn submit_is_noop_when_idle() {
        let (fake, mut orchestrator) = orchestrator();
        let outcome = orchestrator.submit().await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Ignored(IgnoreReason::NotReady(SessionState::Idle))
        );
        assert!(fake.processes().is_empty());
    }

    #[tokio::test]
    async fn submit_is_noop_without_font() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        let outcome = orchestrator.submit().await.unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::FontNotSelected));
        assert!(fake.processes().is_empty());
        assert_eq!(orchestrator.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn submit_sends_mapped_style_and_displays_output() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        fake.push_process(process_ok(
            b"rendered",
            Some("1\n00:00:00,000 --> 00:00:01,500\nHELLO\n"),
        ));

        let style = orchestrator.style_mut().unwrap();
        style.select_font(FontFile::ArialBold);
        style.set_letter_spacing(LetterSpacing::Wider);

        let outcome = orchestrator.submit().await.unwrap();
        assert_eq!(outcome, Outcome::Applied);

        let processes = fake.processes();
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].0, SessionId::new("session-1"));
        assert_eq!(processes[0].1.font, FontFile::ArialBold);
        assert_eq!(processes[0].1.letter_spacing, 4);
        assert_eq!(
            fake.observed_states(),
            vec![SessionState::Uploading, SessionState::Submitting]
        );

        assert_eq!(orchestrator.state(), SessionState::Ready);
        assert_eq!(
            orchestrator.displayed_blob().unwrap().bytes.as_ref(),
            b"rendered"
        );
        assert_eq!(orchestrator.live_handles(), 1);
        assert!(orchestrator
            .session()
            .input_asset
            .as_ref()
            .unwrap()
            .local_handle()
            .is_none());
        assert_eq!(orchestrator.subtitles().unwrap().cues()[0].text, "HELLO");
    }

    #[tokio::test]
    async fn failed_submit_returns_to_ready_with_input_displayed() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        fake.push_process(Err(SessionError::Remote {
            status: 500,
            body: "render failed".into(),
        }));
        orchestrator
            .style_mut()
            .unwrap()
            .select_font(FontFile::Impact);
        let before = orchestrator.displayed_asset().cloned();

        let err = orchestrator.submit().await.unwrap_err();

        assert!(matches!(err, SessionError::Remote { status: 500, .. }));
        assert_eq!(orchestrator.state(), SessionState::Ready);
        assert_eq!(orchestrator.displayed_asset().cloned(), before);
        assert_eq!(
            orchestrator.displayed_blob().unwrap().bytes.as_ref(),
            b"input bytes"
        );
        assert_eq!(orchestrator.last_error().unwrap().code, "REMOTE_ERROR");
        assert!(orchestrator.style_editable());

        // Retry succeeds.
        assert_eq!(orchestrator.submit().await.unwrap(), Outcome::Applied);
        assert!(orchestrator.last_error().is_none());
    }

    #[tokio::test]
    async fn repeated_renders_release_previous_handle() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        orchestrator
            .style_mut()
            .unwrap()
            .select_font(FontFile::Anton);

        fake.push_process(process_ok(b"first", None));
        orchestrator.submit().await.unwrap();
        let first_handle = orchestrator
            .displayed_asset()
            .unwrap()
            .local_handle()
            .cloned()
            .unwrap();

        fake.push_process(process_ok(b"second", None));
        orchestrator.submit().await.unwrap();

        assert_eq!(orchestrator.live_handles(), 1);
        assert!(orchestrator.codec.resolve(&first_handle).is_none());
        assert_eq!(
            orchestrator.displayed_blob().unwrap().bytes.as_ref(),
            b"second"
        );
        assert!(orchestrator.subtitles().is_none());
    }

    #[tokio::test]
    async fn unreadable_subtitles_do_not_fail_render() {
        let (fake, mut orchestrator) = ready_orchestrator().await;
        orchestrator
            .style_mut()
            .unwrap()
            .select_font(FontFile::OswaldBold);
        fake.push_process(process_ok(b"out", Some("garbage")));

        assert_eq!(orchestrator.submit().await.unwrap(), Outcome::Applied);
        assert!(orchestrator.subtitles().is_none());
    }

    #[tokio::test]
    async fn teardown_cleans_up_once() {
        let (fake, mut orchestrator) = ready_orchestrator().await;

        orchestrator.teardown().unwrap().await.unwrap();
        assert!(orchestrator.teardown().is_none());
        drop(orchestrator);
        tokio::task::yield_now().await;

        assert_eq!(fake.cleanups(), vec![SessionId::new("session-1")]);
    }

    #[tokio::test]
    async fn teardown_without_session_sends_nothing() {
        let (fake, mut orchestrator) = orchestrator();
        assert!(orchestrator.teardown().is_none());

        let outcome = orchestrator.select_file(video_of(10)).await.unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::TornDown));
        drop(orchestrator);
        tokio::task::yield_now().await;

        assert!(fake.cleanups().is_empty());
        assert!(fake.uploads().is_empty());
    }

    #[tokio::test]
    async fn teardown_releases_blobs() {
        let (_fake, mut orchestrator) = ready_orchestrator().await;
        let _ = orchestrator.teardown();
        assert_eq!(orchestrator.live_handles(), 0);
        assert!(orchestrator.displayed_blob().is_none());
    }

    #[tokio::test]
    async fn drop_fires_cleanup() {
        let (fake, orchestrator) = ready_orchestrator().await;
        drop(orchestrator);

        for _ in 0..10 {
            if !fake.cleanups().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(fake.cleanups(), vec![SessionId::new("session-1")]);
    }
}
