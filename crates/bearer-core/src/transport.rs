//! Transport traits tying the client layer to a transport backend
//!
//! The transport owns connection establishment and the byte-level
//! attribute/notification machinery; the client layer owns call-control
//! policy and state. They meet at two seams:
//!
//! - [`BearerTransport`]: outbound requests, implemented by the backend.
//!   Every method reports the *send* outcome only; results arrive later as
//!   notifications.
//! - [`TransportObserver`]: inbound notifications, implemented by the
//!   client layer and driven by the backend. The backend awaits each call,
//!   so events for one session are delivered and fully processed in order.

use async_trait::async_trait;
use thiserror::Error;

use crate::attribute::{AttributeKind, AttributeValue};
use crate::call::{BearerIndex, CallIndex, CallStateUpdate, TerminationReason};
use crate::control::ControlOp;

/// Opaque handle to one established connection to a peer.
///
/// Allocated by the transport when a connection comes up and carried through
/// every request and notification until the disconnect event.
pub type SessionId = uuid::Uuid;

/// Why a transport send could not be dispatched
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("send failed: {reason}")]
    SendFailed { reason: String },

    #[error("session is not connected")]
    NotConnected,

    #[error("transport is busy")]
    Busy,
}

/// Result type alias for transport sends
pub type TransportResult<T> = Result<T, TransportError>;

/// Outbound request surface of a transport backend.
///
/// All methods are fire-and-forget at the protocol level: `Ok(())` means
/// the request left this host, nothing more.
#[async_trait]
pub trait BearerTransport: Send + Sync {
    /// Start the service-discovery procedure on a session.
    ///
    /// Completion is reported through
    /// [`TransportObserver::on_discovery_complete`].
    async fn discover(&self, session_id: SessionId) -> TransportResult<()>;

    /// Send a call-control request to a bearer on a session.
    async fn send_control(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        op: ControlOp,
    ) -> TransportResult<()>;

    /// Request an asynchronous read of a bearer attribute.
    ///
    /// Completion is reported through
    /// [`TransportObserver::on_attribute_read`].
    async fn read_attribute(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
    ) -> TransportResult<()>;
}

/// Inbound notification surface of the client layer.
///
/// The transport backend invokes these as events arrive. Error codes are
/// peer- or transport-reported: `0` is success, anything else marks the
/// delivery as a failure report rather than a state change.
#[async_trait]
pub trait TransportObserver: Send + Sync {
    /// A connection to a peer came up.
    async fn on_session_connected(&self, session_id: SessionId);

    /// A connection went away; all per-session state must be dropped.
    async fn on_session_disconnected(&self, session_id: SessionId, reason: Option<String>);

    /// The discovery procedure finished.
    async fn on_discovery_complete(
        &self,
        session_id: SessionId,
        error_code: u8,
        bearer_count: u8,
        generic_bearer: bool,
    );

    /// One delivery of call-state reports, possibly covering several calls.
    async fn on_call_states(
        &self,
        session_id: SessionId,
        error_code: u8,
        updates: Vec<CallStateUpdate>,
    );

    /// An attribute read completed.
    async fn on_attribute_read(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
        error_code: u8,
        value: Option<AttributeValue>,
    );

    /// The peer reported why a call ended.
    async fn on_termination_reason(
        &self,
        session_id: SessionId,
        call_index: CallIndex,
        reason: TerminationReason,
    );
}
