//! Event dispatching for the client-core library
//!
//! [`ClientSessionHandler`] is the sole entry point for asynchronous
//! transport events and the only writer of the session, call, and attribute
//! maps. Each event is fully processed - registry mutation, broadcast,
//! observer callback - before the handler returns to the transport driver,
//! so deliveries for one session stay serialized.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};

use ringline_bearer_core::{
    AttributeKind, AttributeValue, BearerIndex, CallIndex, CallState, CallStateUpdate, SessionId,
    TerminationReason, TransportObserver,
};

use crate::call::CallInfo;
use crate::error::ClientError;
use crate::events::{
    AttributeReadInfo, CallStatusInfo, ClientEvent, ClientEventHandler, DiscoveryInfo,
    EventPriority, IncomingCallInfo, TerminationInfo,
};

use super::types::{AttributeRead, ClientStats, DiscoveryState, SessionInfo};

/// Internal handler that turns transport events into registry mutations and
/// client events
pub struct ClientSessionHandler {
    pub(crate) client_event_handler: Arc<RwLock<Option<Arc<dyn ClientEventHandler>>>>,
    pub(crate) sessions: Arc<DashMap<SessionId, SessionInfo>>,
    pub(crate) calls: Arc<DashMap<(SessionId, CallIndex), CallInfo>>,
    pub(crate) attributes: Arc<DashMap<(SessionId, BearerIndex, AttributeKind), AttributeRead>>,
    pub(crate) stats: Arc<Mutex<ClientStats>>,
    pub(crate) max_concurrent_calls: usize,
    pub(crate) event_tx: Option<tokio::sync::broadcast::Sender<ClientEvent>>,
}

impl std::fmt::Debug for ClientSessionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSessionHandler")
            .field("client_event_handler", &"<event handler>")
            .field("sessions", &self.sessions.len())
            .field("calls", &self.calls.len())
            .field("attributes", &self.attributes.len())
            .finish()
    }
}

impl ClientSessionHandler {
    pub fn new(
        sessions: Arc<DashMap<SessionId, SessionInfo>>,
        calls: Arc<DashMap<(SessionId, CallIndex), CallInfo>>,
        attributes: Arc<DashMap<(SessionId, BearerIndex, AttributeKind), AttributeRead>>,
        stats: Arc<Mutex<ClientStats>>,
        max_concurrent_calls: usize,
    ) -> Self {
        Self {
            client_event_handler: Arc::new(RwLock::new(None)),
            sessions,
            calls,
            attributes,
            stats,
            max_concurrent_calls,
            event_tx: None,
        }
    }

    pub fn with_event_tx(
        mut self,
        event_tx: tokio::sync::broadcast::Sender<ClientEvent>,
    ) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub async fn set_event_handler(&self, handler: Arc<dyn ClientEventHandler>) {
        *self.client_event_handler.write().await = Some(handler);
    }

    /// Broadcast an event; a lagging or absent subscriber is not an error
    fn broadcast(&self, event: ClientEvent) {
        if let Some(event_tx) = &self.event_tx {
            let _ = event_tx.send(event);
        }
    }

    /// Deliver an event to the registered handler (if any)
    async fn notify(&self, event: ClientEvent) {
        if let Some(handler) = self.client_event_handler.read().await.as_ref() {
            handler.on_client_event(event).await;
        }
    }

    /// Emit an asynchronous error towards observers
    async fn emit_error(
        &self,
        error: ClientError,
        session_id: Option<SessionId>,
        call_index: Option<CallIndex>,
    ) {
        let event = ClientEvent::ClientError {
            error,
            session_id,
            call_index,
            priority: EventPriority::Critical,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }

    /// Apply one element of a call-state delivery.
    ///
    /// Unknown indices create a record; known indices are overwritten
    /// unconditionally - the server is authoritative and transitions that
    /// skip intermediate states are tolerated. Terminated records are
    /// removed after observers have been notified.
    async fn apply_call_state(&self, session_id: SessionId, update: CallStateUpdate) {
        let key = (session_id, update.index);
        let previous_state = self.calls.get(&key).map(|entry| entry.value().state);

        let is_new = previous_state.is_none();
        match previous_state {
            None => {
                let session_calls = self
                    .calls
                    .iter()
                    .filter(|entry| entry.key().0 == session_id)
                    .count();
                if session_calls >= self.max_concurrent_calls {
                    tracing::warn!(
                        session_id = %session_id,
                        call_index = update.index,
                        active = session_calls,
                        "Peer reported more concurrent calls than configured limit"
                    );
                }
                self.calls
                    .insert(key, CallInfo::new(session_id, update.index, update.state));
                self.stats.lock().await.total_calls += 1;
            }
            Some(previous) => {
                if let Some(mut record) = self.calls.get_mut(&key) {
                    record.previous_state = Some(previous);
                    record.state = update.state;
                    if update.state == CallState::Terminated {
                        record.ended_at = Some(Utc::now());
                    }
                }
            }
        }

        tracing::debug!(
            session_id = %session_id,
            call_index = update.index,
            state = ?update.state,
            previous = ?previous_state,
            "Applied call state"
        );

        if is_new && update.state == CallState::Incoming {
            let event = ClientEvent::IncomingCall {
                info: IncomingCallInfo {
                    session_id,
                    call_index: update.index,
                    timestamp: Utc::now(),
                },
                priority: EventPriority::High,
            };
            self.broadcast(event.clone());
            self.notify(event).await;
        }

        let event = ClientEvent::CallStateChanged {
            info: CallStatusInfo {
                session_id,
                call_index: update.index,
                new_state: update.state,
                previous_state,
                timestamp: Utc::now(),
            },
            priority: EventPriority::Normal,
        };
        self.broadcast(event.clone());
        self.notify(event).await;

        // Terminal: the record goes away only after observers heard about it
        if update.state == CallState::Terminated {
            self.calls.remove(&key);
        }
    }
}

#[async_trait::async_trait]
impl TransportObserver for ClientSessionHandler {
    async fn on_session_connected(&self, session_id: SessionId) {
        if self.sessions.contains_key(&session_id) {
            tracing::warn!(session_id = %session_id, "Connect event for an already known session, resetting it");
            self.calls.retain(|key, _| key.0 != session_id);
            self.attributes.retain(|key, _| key.0 != session_id);
        }
        self.sessions.insert(session_id, SessionInfo::new(session_id));
        self.stats.lock().await.total_sessions += 1;

        tracing::info!(session_id = %session_id, "Session connected");

        let event = ClientEvent::SessionConnected {
            session_id,
            priority: EventPriority::Normal,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }

    async fn on_session_disconnected(&self, session_id: SessionId, reason: Option<String>) {
        // Everything scoped to the session dies with it
        self.sessions.remove(&session_id);
        self.calls.retain(|key, _| key.0 != session_id);
        self.attributes.retain(|key, _| key.0 != session_id);

        tracing::info!(session_id = %session_id, reason = ?reason, "Session disconnected");

        let event = ClientEvent::SessionDisconnected {
            session_id,
            reason,
            priority: EventPriority::High,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }

    async fn on_discovery_complete(
        &self,
        session_id: SessionId,
        error_code: u8,
        bearer_count: u8,
        generic_bearer: bool,
    ) {
        if error_code != 0 {
            if let Some(mut session) = self.sessions.get_mut(&session_id) {
                session.discovery = DiscoveryState::NotStarted;
            }
            tracing::warn!(
                session_id = %session_id,
                error_code = error_code,
                "Service discovery failed"
            );
            self.emit_error(
                ClientError::DiscoveryFailed { code: error_code },
                Some(session_id),
                None,
            )
            .await;
            return;
        }

        match self.sessions.get_mut(&session_id) {
            Some(mut session) => {
                session.discovery = DiscoveryState::Complete {
                    bearer_count,
                    generic_bearer,
                };
            }
            None => {
                tracing::warn!(
                    session_id = %session_id,
                    "Discovery completion for unknown session, ignoring"
                );
                return;
            }
        }

        tracing::info!(
            session_id = %session_id,
            bearer_count = bearer_count,
            generic_bearer = generic_bearer,
            "Service discovery complete"
        );

        let event = ClientEvent::DiscoveryCompleted {
            info: DiscoveryInfo {
                session_id,
                bearer_count,
                generic_bearer,
                timestamp: Utc::now(),
            },
            priority: EventPriority::High,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }

    async fn on_call_states(
        &self,
        session_id: SessionId,
        error_code: u8,
        updates: Vec<CallStateUpdate>,
    ) {
        if error_code != 0 {
            // A failed state read is an error report, not a state change
            tracing::warn!(
                session_id = %session_id,
                error_code = error_code,
                "Call state delivery carried an error, registry unchanged"
            );
            self.emit_error(
                ClientError::RemoteError { code: error_code },
                Some(session_id),
                None,
            )
            .await;
            return;
        }

        // The call-state feed and discovery are independent channels: updates
        // arriving before discovery finished are still recorded.
        for update in updates {
            self.apply_call_state(session_id, update).await;
        }
    }

    async fn on_attribute_read(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
        error_code: u8,
        value: Option<AttributeValue>,
    ) {
        if error_code != 0 {
            tracing::warn!(
                session_id = %session_id,
                bearer_index = bearer_index,
                kind = ?kind,
                error_code = error_code,
                "Attribute read failed, cache unchanged"
            );
            self.emit_error(
                ClientError::RemoteError { code: error_code },
                Some(session_id),
                None,
            )
            .await;
            return;
        }

        let Some(value) = value else {
            self.emit_error(
                ClientError::internal_error("attribute read completed without a value"),
                Some(session_id),
                None,
            )
            .await;
            return;
        };

        // Latest completed read wins; in-flight duplicates simply overwrite
        self.attributes.insert(
            (session_id, bearer_index, kind),
            AttributeRead {
                value: value.clone(),
                completed_at: Utc::now(),
            },
        );

        tracing::debug!(
            session_id = %session_id,
            bearer_index = bearer_index,
            kind = ?kind,
            "Attribute read complete"
        );

        let event = ClientEvent::AttributeRead {
            info: AttributeReadInfo {
                session_id,
                bearer_index,
                kind,
                value,
                timestamp: Utc::now(),
            },
            priority: EventPriority::Normal,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }

    async fn on_termination_reason(
        &self,
        session_id: SessionId,
        call_index: CallIndex,
        reason: TerminationReason,
    ) {
        tracing::info!(
            session_id = %session_id,
            call_index = call_index,
            reason = ?reason,
            "Call termination reason reported"
        );

        // Registry removal is driven by the Terminated state update, not by
        // this notification
        let event = ClientEvent::CallTerminated {
            info: TerminationInfo {
                session_id,
                call_index,
                reason,
                timestamp: Utc::now(),
            },
            priority: EventPriority::Normal,
        };
        self.broadcast(event.clone());
        self.notify(event).await;
    }
}
