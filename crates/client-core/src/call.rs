//! Call registry records
//!
//! This module provides the record type the call registry keeps per
//! `(session, call index)` pair. Records are owned exclusively by the
//! event dispatcher: they are created implicitly by the first state
//! notification for an unseen index, overwritten by every later one, and
//! removed once observers have been told the call terminated.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use ringline_bearer_core::{CallIndex, CallState, SessionId};

/// Information about one tracked call
#[derive(Debug, Clone)]
pub struct CallInfo {
    /// Session the call belongs to
    pub session_id: SessionId,
    /// Per-session call index assigned by the peer
    pub call_index: CallIndex,
    /// Current state of the call, as last reported
    pub state: CallState,
    /// State before the most recent transition (if the call was known)
    pub previous_state: Option<CallState>,
    /// When the call was first reported
    pub created_at: DateTime<Utc>,
    /// When the call reached the terminated state (if it has)
    pub ended_at: Option<DateTime<Utc>>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl CallInfo {
    /// Create a record for a call index seen for the first time
    pub(crate) fn new(session_id: SessionId, call_index: CallIndex, state: CallState) -> Self {
        Self {
            session_id,
            call_index,
            state,
            previous_state: None,
            created_at: Utc::now(),
            ended_at: None,
            metadata: HashMap::new(),
        }
    }
}
