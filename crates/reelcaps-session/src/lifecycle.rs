//! Session id tracking and the teardown cleanup hook.

use reelcaps_api_client::RequestDispatcher;
use reelcaps_core::SessionId;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Owns the session id and sends at most one cleanup request for it.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    session_id: Option<SessionId>,
    torn_down: bool,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the id assigned by the server. The first id wins.
    pub fn assign(&mut self, session_id: SessionId) {
        match &self.session_id {
            Some(existing) if existing != &session_id => {
                tracing::warn!(
                    existing = %existing,
                    ignored = %session_id,
                    "Session id already assigned"
                );
            }
            Some(_) => {}
            None => self.session_id = Some(session_id),
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Fire the cleanup request in the background.
    ///
    /// Only the first call does anything, and only when an id was assigned.
    /// The returned task may be awaited but nothing depends on it.
    pub fn teardown(&mut self, dispatcher: &Arc<dyn RequestDispatcher>) -> Option<JoinHandle<()>> {
        if self.torn_down {
            return None;
        }
        self.torn_down = true;

        let session_id = self.session_id.clone()?;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(session_id = %session_id, "No runtime available, skipping session cleanup");
                return None;
            }
        };

        tracing::info!(session_id = %session_id, "Sending session cleanup");
        let dispatcher = Arc::clone(dispatcher);
        Some(runtime.spawn(async move {
            dispatcher.cleanup(&session_id).await;
        }))
    }
}
