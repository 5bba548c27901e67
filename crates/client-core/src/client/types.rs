//! Type definitions for the client-core library
//!
//! This module contains the data structures shared across the client:
//! discovery status, per-session bookkeeping, attribute cache entries, and
//! client statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ringline_bearer_core::{AttributeValue, SessionId};

/// Status of the service-discovery procedure on one session
///
/// Control operations and attribute reads are only valid once discovery is
/// [`DiscoveryState::Complete`]; the transition into `Complete` happens at
/// most once per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryState {
    /// Discovery has not been requested on this session
    NotStarted,
    /// Discovery was requested and its completion is pending
    InProgress,
    /// Discovery finished successfully
    Complete {
        /// Number of telephone bearers found on the peer
        bearer_count: u8,
        /// Whether a generic aggregator bearer was found
        generic_bearer: bool,
    },
}

impl DiscoveryState {
    /// Check if discovery finished successfully
    pub fn is_complete(&self) -> bool {
        matches!(self, DiscoveryState::Complete { .. })
    }

    /// Check if discovery is currently running
    pub fn is_in_progress(&self) -> bool {
        matches!(self, DiscoveryState::InProgress)
    }
}

/// Per-session bookkeeping kept while a connection is up
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// The session handle
    pub session_id: SessionId,
    /// Discovery status of this session
    pub discovery: DiscoveryState,
    /// When the connect event arrived
    pub connected_at: DateTime<Utc>,
}

impl SessionInfo {
    pub(crate) fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            discovery: DiscoveryState::NotStarted,
            connected_at: Utc::now(),
        }
    }
}

/// One completed attribute read in the per-session cache
///
/// Absence from the cache means "never read"; presence carries the value of
/// the latest completed read and when it completed.
#[derive(Debug, Clone)]
pub struct AttributeRead {
    /// The value delivered by the peer
    pub value: AttributeValue,
    /// When the read completed
    pub completed_at: DateTime<Utc>,
}

/// Statistics about the client's current state and activity
#[derive(Debug, Clone, Default)]
pub struct ClientStats {
    /// Whether the client is currently running and processing events
    pub is_running: bool,
    /// Total number of sessions seen since the client was created
    pub total_sessions: usize,
    /// Number of currently connected sessions
    pub active_sessions: usize,
    /// Total number of calls tracked since the client was created
    pub total_calls: usize,
    /// Number of currently tracked calls
    pub active_calls: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_state_predicates() {
        assert!(!DiscoveryState::NotStarted.is_complete());
        assert!(DiscoveryState::InProgress.is_in_progress());
        assert!(DiscoveryState::Complete {
            bearer_count: 1,
            generic_bearer: true
        }
        .is_complete());
        assert!(!DiscoveryState::Complete {
            bearer_count: 1,
            generic_bearer: false
        }
        .is_in_progress());
    }
}
