//! The main client manager that coordinates all operations
//!
//! `ClientManager` wires the pieces together: it owns the transport handle,
//! the session/call/attribute maps, the broadcast event channel, and the
//! dispatcher that the transport backend drives. Applications use it for
//! every query and command; the transport backend only ever sees the
//! [`TransportObserver`] obtained from [`ClientManager::transport_observer`].
//!
//! # Architecture
//!
//! ```text
//! +-------------------------+
//! |   Application Layer     |
//! +-----------+-------------+
//!             |
//! +-----------v-------------+
//! |   ClientManager         |  - discovery sequencing
//! |   ClientSessionHandler  |  - call registry (single writer)
//! |   event broadcast       |  - control operation gating
//! +-----------+-------------+
//!             |
//! +-----------v-------------+
//! |   BearerTransport       |
//! |   (backend, external)   |
//! +-------------------------+
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ringline_client_core::{ClientConfig, ClientManager, NullTransport};
//!
//! async fn basic_setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_client_name("MyHeadset/1.0");
//!     let client = ClientManager::new(config, Arc::new(NullTransport::new())).await?;
//!
//!     client.start().await?;
//!     assert!(client.is_running().await);
//!
//!     client.stop().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::{timeout_at, Instant};

use ringline_bearer_core::{
    AttributeKind, BearerIndex, BearerTransport, CallIndex, CallState, SessionId,
    TransportObserver,
};

use crate::call::CallInfo;
use crate::error::{ClientError, ClientResult};
use crate::events::{ClientEvent, ClientEventHandler};

use super::config::ClientConfig;
use super::handler::ClientSessionHandler;
use super::types::{AttributeRead, ClientStats, DiscoveryState, SessionInfo};

/// High-level call-control client manager
pub struct ClientManager {
    /// Transport backend used for every outbound request
    pub(crate) transport: Arc<dyn BearerTransport>,

    /// Client configuration
    pub(crate) config: ClientConfig,

    /// Whether the client is running
    pub(crate) is_running: Arc<RwLock<bool>>,

    /// Statistics
    pub(crate) stats: Arc<Mutex<ClientStats>>,

    /// Per-session bookkeeping, keyed by session
    pub(crate) sessions: Arc<DashMap<SessionId, SessionInfo>>,

    /// Call registry, keyed by (session, call index)
    pub(crate) calls: Arc<DashMap<(SessionId, CallIndex), CallInfo>>,

    /// Attribute cache, keyed by (session, bearer index, attribute kind)
    pub(crate) attributes: Arc<DashMap<(SessionId, BearerIndex, AttributeKind), AttributeRead>>,

    /// Event dispatcher driven by the transport backend
    pub(crate) handler: Arc<ClientSessionHandler>,

    /// Event broadcast channel
    pub(crate) event_tx: broadcast::Sender<ClientEvent>,
}

impl std::fmt::Debug for ClientManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientManager")
            .field("config", &self.config)
            .field("sessions", &self.sessions.len())
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl ClientManager {
    /// Create a new client manager with the given configuration and
    /// transport backend.
    ///
    /// The returned `Arc<ClientManager>` can be shared freely across tasks;
    /// hand [`ClientManager::transport_observer`] to the transport driver to
    /// complete the wiring.
    ///
    /// # Errors
    ///
    /// * `ClientError::InvalidConfiguration` - if the configuration fails
    ///   validation
    pub async fn new(
        config: ClientConfig,
        transport: Arc<dyn BearerTransport>,
    ) -> ClientResult<Arc<Self>> {
        config.validate()?;

        let sessions = Arc::new(DashMap::new());
        let calls = Arc::new(DashMap::new());
        let attributes = Arc::new(DashMap::new());
        let stats = Arc::new(Mutex::new(ClientStats::default()));

        let (event_tx, _) = broadcast::channel(config.event_buffer_size);

        let handler = Arc::new(
            ClientSessionHandler::new(
                sessions.clone(),
                calls.clone(),
                attributes.clone(),
                stats.clone(),
                config.max_concurrent_calls,
            )
            .with_event_tx(event_tx.clone()),
        );

        Ok(Arc::new(Self {
            transport,
            config,
            is_running: Arc::new(RwLock::new(false)),
            stats,
            sessions,
            calls,
            attributes,
            handler,
            event_tx,
        }))
    }

    /// Register the application's event handler.
    ///
    /// The handler's methods all have default no-op bodies, so applications
    /// override only the callbacks they care about. Setting a new handler
    /// replaces the previous one.
    pub async fn set_event_handler(&self, handler: Arc<dyn ClientEventHandler>) {
        self.handler.set_event_handler(handler).await;
    }

    /// Subscribe to the broadcast event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.event_tx.subscribe()
    }

    /// The dispatcher the transport backend must drive with its events
    pub fn transport_observer(&self) -> Arc<dyn TransportObserver> {
        self.handler.clone() as Arc<dyn TransportObserver>
    }

    /// Start the client manager.
    ///
    /// Operations issued before `start()` fail with `ClientError::NotStarted`.
    /// Starting an already started client is a no-op.
    pub async fn start(&self) -> ClientResult<()> {
        *self.is_running.write().await = true;
        self.stats.lock().await.is_running = true;
        tracing::info!(client = %self.config.client_name, "ClientManager started");
        Ok(())
    }

    /// Stop the client manager.
    ///
    /// Per-session state is left in place: it is owned by the transport's
    /// connect/disconnect events, not by the client lifecycle.
    pub async fn stop(&self) -> ClientResult<()> {
        *self.is_running.write().await = false;
        self.stats.lock().await.is_running = false;
        tracing::info!(client = %self.config.client_name, "ClientManager stopped");
        Ok(())
    }

    /// Whether the client is currently running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get a snapshot of client statistics
    pub async fn get_client_stats(&self) -> ClientStats {
        let mut stats = self.stats.lock().await.clone();
        stats.is_running = *self.is_running.read().await;
        stats.active_sessions = self.sessions.len();
        stats.active_calls = self.calls.len();
        stats
    }

    /// The configuration this client was built with
    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    /// Look up a session, failing with `SessionNotFound` if unknown
    pub(crate) fn session(&self, session_id: SessionId) -> ClientResult<SessionInfo> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
            .ok_or(ClientError::SessionNotFound { session_id })
    }

    /// Common precondition check for control operations and attribute
    /// reads: client started, session known, discovery complete.
    pub(crate) async fn ensure_ready(&self, session_id: SessionId) -> ClientResult<()> {
        if !*self.is_running.read().await {
            return Err(ClientError::NotStarted);
        }
        let session = self.session(session_id)?;
        if !session.discovery.is_complete() {
            return Err(ClientError::DiscoveryNotComplete { session_id });
        }
        Ok(())
    }

    /// Wait until a call reaches the given state, with a bounded timeout.
    ///
    /// This is the condition-wait primitive for "wait for state X" logic:
    /// it subscribes to the event stream, checks the registry once, and then
    /// awaits matching state-change events. It never polls.
    ///
    /// # Errors
    ///
    /// * `ClientError::OperationTimeout` - the state was not observed in time
    pub async fn wait_for_call_state(
        &self,
        session_id: SessionId,
        call_index: CallIndex,
        target: CallState,
        timeout: Duration,
    ) -> ClientResult<()> {
        let deadline = Instant::now() + timeout;
        // Subscribe before the registry check so no transition can slip
        // between the two
        let mut events = self.event_tx.subscribe();

        if self
            .calls
            .get(&(session_id, call_index))
            .map(|entry| entry.value().state)
            == Some(target)
        {
            return Ok(());
        }

        loop {
            match timeout_at(deadline, events.recv()).await {
                Ok(Ok(ClientEvent::CallStateChanged { info, .. }))
                    if info.session_id == session_id
                        && info.call_index == call_index
                        && info.new_state == target =>
                {
                    return Ok(());
                }
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::warn!(
                        session_id = %session_id,
                        call_index = call_index,
                        skipped = skipped,
                        "Event stream lagged while waiting, re-checking registry"
                    );
                    if self
                        .calls
                        .get(&(session_id, call_index))
                        .map(|entry| entry.value().state)
                        == Some(target)
                    {
                        return Ok(());
                    }
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(ClientError::internal_error("event channel closed"));
                }
                Err(_) => {
                    return Err(ClientError::OperationTimeout {
                        duration_ms: timeout.as_millis() as u64,
                    });
                }
            }
        }
    }

    /// Wait until discovery completes on a session, with a bounded timeout.
    ///
    /// Returns the completed [`DiscoveryState`] on success; a discovery
    /// failure observed while waiting is returned as
    /// `ClientError::DiscoveryFailed`.
    pub async fn wait_for_discovery(
        &self,
        session_id: SessionId,
        timeout: Duration,
    ) -> ClientResult<DiscoveryState> {
        let deadline = Instant::now() + timeout;
        let mut events = self.event_tx.subscribe();

        let current = self.session(session_id)?.discovery;
        if current.is_complete() {
            return Ok(current);
        }

        loop {
            match timeout_at(deadline, events.recv()).await {
                Ok(Ok(ClientEvent::DiscoveryCompleted { info, .. }))
                    if info.session_id == session_id =>
                {
                    return Ok(DiscoveryState::Complete {
                        bearer_count: info.bearer_count,
                        generic_bearer: info.generic_bearer,
                    });
                }
                Ok(Ok(ClientEvent::ClientError {
                    error: ClientError::DiscoveryFailed { code },
                    session_id: Some(event_session),
                    ..
                })) if event_session == session_id => {
                    return Err(ClientError::DiscoveryFailed { code });
                }
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => {
                    let state = self.session(session_id)?.discovery;
                    if state.is_complete() {
                        return Ok(state);
                    }
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(ClientError::internal_error("event channel closed"));
                }
                Err(_) => {
                    return Err(ClientError::OperationTimeout {
                        duration_ms: timeout.as_millis() as u64,
                    });
                }
            }
        }
    }
}
