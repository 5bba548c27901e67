//! Transport stubs for tests and examples
//!
//! Real deployments implement [`BearerTransport`] over the actual wireless
//! link. [`NullTransport`] accepts and records every send without any I/O,
//! which is all examples and tests need: notifications are then injected
//! directly through the dispatcher obtained from
//! `ClientManager::transport_observer()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use ringline_bearer_core::{
    AttributeKind, BearerIndex, BearerTransport, ControlOp, SessionId, TransportError,
    TransportResult,
};

/// One request accepted by a [`NullTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentRequest {
    /// A discovery procedure was started
    Discover { session_id: SessionId },
    /// A call-control request was sent
    Control {
        session_id: SessionId,
        bearer_index: BearerIndex,
        op: ControlOp,
    },
    /// An attribute read was requested
    AttributeRead {
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
    },
}

/// A transport backend that accepts every send and records it.
///
/// Useful for examples and tests; can be switched into a failing mode to
/// exercise send-failure paths.
#[derive(Debug, Default)]
pub struct NullTransport {
    sent: Mutex<Vec<SentRequest>>,
    fail_sends: AtomicBool,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again)
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every request accepted so far
    pub fn sent_requests(&self) -> Vec<SentRequest> {
        self.sent.lock().expect("request log poisoned").clone()
    }

    /// Drain the request log
    pub fn take_requests(&self) -> Vec<SentRequest> {
        std::mem::take(&mut *self.sent.lock().expect("request log poisoned"))
    }

    fn record(&self, request: SentRequest) -> TransportResult<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed {
                reason: "null transport configured to fail".to_string(),
            });
        }
        self.sent.lock().expect("request log poisoned").push(request);
        Ok(())
    }
}

#[async_trait]
impl BearerTransport for NullTransport {
    async fn discover(&self, session_id: SessionId) -> TransportResult<()> {
        self.record(SentRequest::Discover { session_id })
    }

    async fn send_control(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        op: ControlOp,
    ) -> TransportResult<()> {
        self.record(SentRequest::Control {
            session_id,
            bearer_index,
            op,
        })
    }

    async fn read_attribute(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        kind: AttributeKind,
    ) -> TransportResult<()> {
        self.record(SentRequest::AttributeRead {
            session_id,
            bearer_index,
            kind,
        })
    }
}
