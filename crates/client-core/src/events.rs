//! Event handling for client-core operations
//!
//! This module provides the event system for call-control client
//! operations: discovery completion, call-state changes, incoming calls,
//! attribute-read completions, call termination reasons, and asynchronous
//! errors.
//!
//! Events reach the application on two paths, both fed by the dispatcher:
//!
//! - a registered [`ClientEventHandler`]: one method per event kind, every
//!   method with a default no-op body, so a handler overrides only what it
//!   cares about;
//! - a broadcast channel obtained from `ClientManager::subscribe_events()`
//!   for subscription-style consumers.
//!
//! # Basic Event Handler
//!
//! ```rust
//! use ringline_client_core::events::{ClientEventHandler, CallStatusInfo, DiscoveryInfo};
//! use async_trait::async_trait;
//!
//! struct MyEventHandler;
//!
//! #[async_trait]
//! impl ClientEventHandler for MyEventHandler {
//!     async fn on_discovery_complete(&self, info: DiscoveryInfo) {
//!         println!("discovered {} bearer(s)", info.bearer_count);
//!     }
//!
//!     async fn on_call_state_changed(&self, info: CallStatusInfo) {
//!         println!("call {} is now {:?}", info.call_index, info.new_state);
//!     }
//! }
//! ```

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ringline_bearer_core::{
    AttributeKind, AttributeValue, BearerIndex, CallIndex, CallState, SessionId,
    TerminationReason,
};

use crate::error::ClientError;

/// Priority of an event, usable for filtering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EventPriority {
    /// Informational events
    Low,
    /// Routine state changes
    Normal,
    /// Events that usually require application attention
    High,
    /// Failures and teardown
    Critical,
}

/// Information about a completed service discovery
#[derive(Debug, Clone)]
pub struct DiscoveryInfo {
    /// Session the discovery ran on
    pub session_id: SessionId,
    /// Number of telephone bearers found on the peer
    pub bearer_count: u8,
    /// Whether a generic aggregator bearer was found
    pub generic_bearer: bool,
    /// When the discovery completed
    pub timestamp: DateTime<Utc>,
}

/// Information about a call state change
#[derive(Debug, Clone)]
pub struct CallStatusInfo {
    /// Session the call belongs to
    pub session_id: SessionId,
    /// Call that changed state
    pub call_index: CallIndex,
    /// New call state after the transition
    pub new_state: CallState,
    /// Previous call state before the transition (if the call was known)
    pub previous_state: Option<CallState>,
    /// When the state change was applied
    pub timestamp: DateTime<Utc>,
}

/// Information about a newly appeared incoming call
#[derive(Debug, Clone)]
pub struct IncomingCallInfo {
    /// Session the call arrived on
    pub session_id: SessionId,
    /// Call index assigned by the peer
    pub call_index: CallIndex,
    /// When the incoming call was first reported
    pub timestamp: DateTime<Utc>,
}

/// Information about a completed bearer attribute read
#[derive(Debug, Clone)]
pub struct AttributeReadInfo {
    /// Session the read ran on
    pub session_id: SessionId,
    /// Bearer the attribute belongs to
    pub bearer_index: BearerIndex,
    /// Which attribute was read
    pub kind: AttributeKind,
    /// The value delivered by the peer
    pub value: AttributeValue,
    /// When the read completed
    pub timestamp: DateTime<Utc>,
}

/// Information about why a call ended
#[derive(Debug, Clone)]
pub struct TerminationInfo {
    /// Session the call belonged to
    pub session_id: SessionId,
    /// Call that ended
    pub call_index: CallIndex,
    /// Peer-reported reason
    pub reason: TerminationReason,
    /// When the reason was reported
    pub timestamp: DateTime<Utc>,
}

/// All events emitted by the client
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A session to a peer came up
    SessionConnected {
        session_id: SessionId,
        priority: EventPriority,
    },
    /// A session went away; its per-session state has been dropped
    SessionDisconnected {
        session_id: SessionId,
        reason: Option<String>,
        priority: EventPriority,
    },
    /// Service discovery completed successfully
    DiscoveryCompleted {
        info: DiscoveryInfo,
        priority: EventPriority,
    },
    /// A previously unknown call appeared in the incoming state
    IncomingCall {
        info: IncomingCallInfo,
        priority: EventPriority,
    },
    /// A call changed state
    CallStateChanged {
        info: CallStatusInfo,
        priority: EventPriority,
    },
    /// The peer reported why a call ended
    CallTerminated {
        info: TerminationInfo,
        priority: EventPriority,
    },
    /// A bearer attribute read completed
    AttributeRead {
        info: AttributeReadInfo,
        priority: EventPriority,
    },
    /// An asynchronous error was reported
    ClientError {
        error: ClientError,
        session_id: Option<SessionId>,
        call_index: Option<CallIndex>,
        priority: EventPriority,
    },
}

impl ClientEvent {
    /// Get the priority of this event
    pub fn priority(&self) -> EventPriority {
        match self {
            ClientEvent::SessionConnected { priority, .. }
            | ClientEvent::SessionDisconnected { priority, .. }
            | ClientEvent::DiscoveryCompleted { priority, .. }
            | ClientEvent::IncomingCall { priority, .. }
            | ClientEvent::CallStateChanged { priority, .. }
            | ClientEvent::CallTerminated { priority, .. }
            | ClientEvent::AttributeRead { priority, .. }
            | ClientEvent::ClientError { priority, .. } => *priority,
        }
    }

    /// Get the session this event belongs to (if any)
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            ClientEvent::SessionConnected { session_id, .. }
            | ClientEvent::SessionDisconnected { session_id, .. } => Some(*session_id),
            ClientEvent::DiscoveryCompleted { info, .. } => Some(info.session_id),
            ClientEvent::IncomingCall { info, .. } => Some(info.session_id),
            ClientEvent::CallStateChanged { info, .. } => Some(info.session_id),
            ClientEvent::CallTerminated { info, .. } => Some(info.session_id),
            ClientEvent::AttributeRead { info, .. } => Some(info.session_id),
            ClientEvent::ClientError { session_id, .. } => *session_id,
        }
    }

    /// Get the call index this event refers to (if any)
    pub fn call_index(&self) -> Option<CallIndex> {
        match self {
            ClientEvent::IncomingCall { info, .. } => Some(info.call_index),
            ClientEvent::CallStateChanged { info, .. } => Some(info.call_index),
            ClientEvent::CallTerminated { info, .. } => Some(info.call_index),
            ClientEvent::ClientError { call_index, .. } => *call_index,
            _ => None,
        }
    }
}

/// Event filtering options for selective consumption
///
/// A filter with no criteria matches every event.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Minimum priority an event must have
    pub min_priority: Option<EventPriority>,
    /// Only events for these sessions
    pub session_ids: Option<HashSet<SessionId>>,
    /// Only events for these call indices
    pub call_indices: Option<HashSet<CallIndex>>,
}

impl EventFilter {
    /// Check whether an event passes this filter
    pub fn matches(&self, event: &ClientEvent) -> bool {
        if let Some(min) = self.min_priority {
            if event.priority() < min {
                return false;
            }
        }
        if let Some(sessions) = &self.session_ids {
            match event.session_id() {
                Some(id) if sessions.contains(&id) => {}
                _ => return false,
            }
        }
        if let Some(indices) = &self.call_indices {
            match event.call_index() {
                Some(idx) if indices.contains(&idx) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Handler trait for client events, one method per event kind.
///
/// Every method has a default no-op body: implementors override only the
/// callbacks they care about, and an unset handler slot costs nothing.
#[async_trait]
pub trait ClientEventHandler: Send + Sync {
    /// A session came up
    async fn on_session_connected(&self, _session_id: SessionId) {}

    /// A session went away
    async fn on_session_disconnected(&self, _session_id: SessionId, _reason: Option<String>) {}

    /// Service discovery completed successfully
    async fn on_discovery_complete(&self, _info: DiscoveryInfo) {}

    /// A previously unknown call appeared in the incoming state
    async fn on_incoming_call(&self, _info: IncomingCallInfo) {}

    /// A call changed state
    async fn on_call_state_changed(&self, _info: CallStatusInfo) {}

    /// The peer reported why a call ended
    async fn on_call_terminated(&self, _info: TerminationInfo) {}

    /// A bearer attribute read completed
    async fn on_attribute_read(&self, _info: AttributeReadInfo) {}

    /// An asynchronous error was reported
    async fn on_client_error(
        &self,
        _error: ClientError,
        _session_id: Option<SessionId>,
        _call_index: Option<CallIndex>,
    ) {
    }

    /// Dispatch a [`ClientEvent`] to the per-kind callbacks above
    async fn on_client_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::SessionConnected { session_id, .. } => {
                self.on_session_connected(session_id).await;
            }
            ClientEvent::SessionDisconnected {
                session_id, reason, ..
            } => {
                self.on_session_disconnected(session_id, reason).await;
            }
            ClientEvent::DiscoveryCompleted { info, .. } => {
                self.on_discovery_complete(info).await;
            }
            ClientEvent::IncomingCall { info, .. } => {
                self.on_incoming_call(info).await;
            }
            ClientEvent::CallStateChanged { info, .. } => {
                self.on_call_state_changed(info).await;
            }
            ClientEvent::CallTerminated { info, .. } => {
                self.on_call_terminated(info).await;
            }
            ClientEvent::AttributeRead { info, .. } => {
                self.on_attribute_read(info).await;
            }
            ClientEvent::ClientError {
                error,
                session_id,
                call_index,
                ..
            } => {
                self.on_client_error(error, session_id, call_index).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_are_ordered() {
        assert!(EventPriority::Low < EventPriority::Normal);
        assert!(EventPriority::Normal < EventPriority::High);
        assert!(EventPriority::High < EventPriority::Critical);
    }

    fn state_event(session_id: SessionId, call_index: CallIndex) -> ClientEvent {
        ClientEvent::CallStateChanged {
            info: CallStatusInfo {
                session_id,
                call_index,
                new_state: CallState::Active,
                previous_state: Some(CallState::Alerting),
                timestamp: Utc::now(),
            },
            priority: EventPriority::Normal,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let event = state_event(uuid::Uuid::new_v4(), 0);
        assert!(EventFilter::default().matches(&event));
    }

    #[test]
    fn filter_by_session_and_priority() {
        let session_id = uuid::Uuid::new_v4();
        let event = state_event(session_id, 2);

        let mut sessions = HashSet::new();
        sessions.insert(session_id);
        let filter = EventFilter {
            session_ids: Some(sessions),
            min_priority: Some(EventPriority::Normal),
            call_indices: None,
        };
        assert!(filter.matches(&event));

        let strict = EventFilter {
            min_priority: Some(EventPriority::Critical),
            ..EventFilter::default()
        };
        assert!(!strict.matches(&event));

        let mut other_sessions = HashSet::new();
        other_sessions.insert(uuid::Uuid::new_v4());
        let other = EventFilter {
            session_ids: Some(other_sessions),
            ..EventFilter::default()
        };
        assert!(!other.matches(&event));
    }

    #[test]
    fn filter_by_call_index_requires_a_call_event() {
        let mut indices = HashSet::new();
        indices.insert(0u8);
        let filter = EventFilter {
            call_indices: Some(indices),
            ..EventFilter::default()
        };

        assert!(filter.matches(&state_event(uuid::Uuid::new_v4(), 0)));
        assert!(!filter.matches(&state_event(uuid::Uuid::new_v4(), 1)));
        // Events without a call index do not pass a call-index filter
        let connected = ClientEvent::SessionConnected {
            session_id: uuid::Uuid::new_v4(),
            priority: EventPriority::Normal,
        };
        assert!(!filter.matches(&connected));
    }

    #[tokio::test]
    async fn default_handler_methods_are_no_ops() {
        struct Silent;
        #[async_trait]
        impl ClientEventHandler for Silent {}

        // Exercise the dispatch path with an unmodified handler
        let handler = Silent;
        handler
            .on_client_event(state_event(uuid::Uuid::new_v4(), 0))
            .await;
        handler
            .on_client_event(ClientEvent::ClientError {
                error: ClientError::RemoteError { code: 3 },
                session_id: None,
                call_index: None,
                priority: EventPriority::Critical,
            })
            .await;
    }
}
