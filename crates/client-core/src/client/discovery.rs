//! Service discovery operations
//!
//! Discovery walks the peer's exposed call-control services and determines
//! whether a generic aggregator bearer is present. It is a strict
//! prerequisite: every control operation and attribute read on a session is
//! refused until the discovery-complete notification has been applied.

use ringline_bearer_core::SessionId;

use crate::error::{ClientError, ClientResult};

use super::recovery::{retry_with_backoff, ErrorContext, RetryConfig};
use super::types::DiscoveryState;

/// Discovery operations implementation for ClientManager
impl super::manager::ClientManager {
    /// Start service discovery on a session.
    ///
    /// At most one discovery may be in flight per session, and a session
    /// that already completed discovery is not discovered again - the
    /// procedure runs once per connection.
    ///
    /// Acceptance means the request was sent; the outcome arrives through
    /// the dispatcher and flips the session's [`DiscoveryState`]. A
    /// transport-level send failure leaves the session back at
    /// `NotStarted` so the caller may retry.
    ///
    /// # Errors
    ///
    /// * `ClientError::NotStarted` - the client is not running
    /// * `ClientError::SessionNotFound` - no such session
    /// * `ClientError::DiscoveryInProgress` - a discovery is already running
    /// * `ClientError::DiscoveryAlreadyComplete` - the session is discovered
    /// * `ClientError::InternalError` - the discovery request could not be
    ///   sent after retries
    pub async fn discover(&self, session_id: SessionId) -> ClientResult<()> {
        if !*self.is_running.read().await {
            return Err(ClientError::NotStarted);
        }

        {
            let mut session = self
                .sessions
                .get_mut(&session_id)
                .ok_or(ClientError::SessionNotFound { session_id })?;
            match session.discovery {
                DiscoveryState::InProgress => {
                    return Err(ClientError::DiscoveryInProgress { session_id })
                }
                DiscoveryState::Complete { .. } => {
                    return Err(ClientError::DiscoveryAlreadyComplete { session_id })
                }
                DiscoveryState::NotStarted => {
                    session.discovery = DiscoveryState::InProgress;
                }
            }
        }

        tracing::info!(session_id = %session_id, "Starting bearer service discovery");

        let sent = retry_with_backoff("discover", RetryConfig::quick(), || async {
            self.transport
                .discover(session_id)
                .await
                .map_err(ClientError::from)
        })
        .await
        .with_context(|| format!("Failed to start discovery on session {}", session_id));

        if let Err(e) = sent {
            // The request never left; discovery may be attempted again
            if let Some(mut session) = self.sessions.get_mut(&session_id) {
                session.discovery = DiscoveryState::NotStarted;
            }
            return Err(e);
        }

        Ok(())
    }

    /// Current discovery status of a session
    ///
    /// # Errors
    ///
    /// * `ClientError::SessionNotFound` - no such session
    pub fn discovery_state(&self, session_id: SessionId) -> ClientResult<DiscoveryState> {
        Ok(self.session(session_id)?.discovery)
    }
}
