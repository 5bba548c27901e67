//! Call lifecycle vocabulary
//!
//! Call states are peer-reported: the server hosting the bearer service is
//! authoritative, and a client observes transitions exclusively through its
//! notification feed. Nothing in this module infers a transition locally.

use serde::{Deserialize, Serialize};

/// Per-session identifier of one in-progress call, assigned by the peer.
pub type CallIndex = u8;

/// Identifier of one telephone bearer instance on the peer.
pub type BearerIndex = u8;

/// Reserved bearer index addressing the generic aggregator bearer, which
/// represents all underlying telephony bearers as one logical service.
pub const GENERIC_BEARER_INDEX: BearerIndex = 0xFF;

/// Current state of a call, as reported by the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallState {
    /// A remote party is calling; the call has not been accepted yet
    Incoming,
    /// An outgoing call is being set up towards the remote party
    Dialing,
    /// The remote party is being alerted (ringing)
    Alerting,
    /// The call is established and active
    Active,
    /// The call is held on this side only
    LocallyHeld,
    /// The call is held on the remote side only
    RemotelyHeld,
    /// The call is held on both sides
    LocallyAndRemotelyHeld,
    /// The call has ended
    Terminated,
}

impl CallState {
    /// Check if the call is held on either side
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            CallState::LocallyHeld | CallState::RemotelyHeld | CallState::LocallyAndRemotelyHeld
        )
    }

    /// Check if the call is held on this side (alone or together with the remote side)
    pub fn is_locally_held(&self) -> bool {
        matches!(
            self,
            CallState::LocallyHeld | CallState::LocallyAndRemotelyHeld
        )
    }

    /// Check if the call has ended
    pub fn is_terminated(&self) -> bool {
        matches!(self, CallState::Terminated)
    }

    /// Check if the call is still in progress
    pub fn is_in_progress(&self) -> bool {
        !self.is_terminated()
    }
}

/// One element of a call-state notification.
///
/// A single delivery from the peer may carry the state of several calls;
/// each entry is independent and every entry must be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStateUpdate {
    /// Call the state applies to
    pub index: CallIndex,
    /// Reported state
    pub state: CallState,
}

impl CallStateUpdate {
    pub fn new(index: CallIndex, state: CallState) -> Self {
        Self { index, state }
    }
}

/// Reason a call ended, delivered in a dedicated notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The target URI was improperly formed
    ImproperUri,
    /// The call setup failed
    CallFailed,
    /// The remote party ended the call
    RemoteEnded,
    /// The server hosting the bearer ended the call
    ServerEnded,
    /// The line was busy
    LineBusy,
    /// Network congestion prevented the call
    NetworkCongestion,
    /// This client ended the call
    ClientEnded,
    /// No service was available
    NoService,
    /// The remote party did not answer
    NoAnswer,
    /// No further detail available
    Unspecified,
}

impl TerminationReason {
    /// Decode a wire reason code; unknown codes map to `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(TerminationReason::ImproperUri),
            0x01 => Some(TerminationReason::CallFailed),
            0x02 => Some(TerminationReason::RemoteEnded),
            0x03 => Some(TerminationReason::ServerEnded),
            0x04 => Some(TerminationReason::LineBusy),
            0x05 => Some(TerminationReason::NetworkCongestion),
            0x06 => Some(TerminationReason::ClientEnded),
            0x07 => Some(TerminationReason::NoService),
            0x08 => Some(TerminationReason::NoAnswer),
            0x09 => Some(TerminationReason::Unspecified),
            _ => None,
        }
    }

    /// The wire reason code
    pub fn code(&self) -> u8 {
        match self {
            TerminationReason::ImproperUri => 0x00,
            TerminationReason::CallFailed => 0x01,
            TerminationReason::RemoteEnded => 0x02,
            TerminationReason::ServerEnded => 0x03,
            TerminationReason::LineBusy => 0x04,
            TerminationReason::NetworkCongestion => 0x05,
            TerminationReason::ClientEnded => 0x06,
            TerminationReason::NoService => 0x07,
            TerminationReason::NoAnswer => 0x08,
            TerminationReason::Unspecified => 0x09,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_predicates() {
        assert!(CallState::LocallyHeld.is_held());
        assert!(CallState::RemotelyHeld.is_held());
        assert!(CallState::LocallyAndRemotelyHeld.is_held());
        assert!(CallState::LocallyAndRemotelyHeld.is_locally_held());
        assert!(!CallState::RemotelyHeld.is_locally_held());
        assert!(!CallState::Active.is_held());
    }

    #[test]
    fn terminated_is_not_in_progress() {
        assert!(CallState::Terminated.is_terminated());
        assert!(!CallState::Terminated.is_in_progress());
        assert!(CallState::Incoming.is_in_progress());
        assert!(CallState::Dialing.is_in_progress());
    }

    #[test]
    fn termination_reason_codes_round_trip() {
        for code in 0x00..=0x09 {
            let reason = TerminationReason::from_code(code).unwrap();
            assert_eq!(reason.code(), code);
        }
        assert_eq!(TerminationReason::from_code(0x42), None);
    }

    #[test]
    fn call_state_serializes_by_name() {
        let json = serde_json::to_string(&CallState::RemotelyHeld).unwrap();
        assert_eq!(json, "\"RemotelyHeld\"");
        let back: CallState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CallState::RemotelyHeld);
    }
}
