//! Call operations for the client-core library
//!
//! This module contains the control-operation issuer and the registry
//! queries. Every control operation is gated on the same preconditions -
//! client started, session known, discovery complete - and reports the
//! *send* outcome only: whether the request reached the transport. Call
//! progress is observed exclusively through the registry feed, never
//! through a return value here.
//!
//! # Call Control Overview
//!
//! - **Outgoing calls**: `originate()`
//! - **Incoming calls**: `accept()`
//! - **Hold management**: `hold()`, `retrieve()`
//! - **Teardown**: `terminate()`
//! - **Multi-call**: `join()`
//! - **Queries**: `get_call()`, `list_calls()`
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use ringline_client_core::{ClientManager, GENERIC_BEARER_INDEX};
//! # async fn example(client: Arc<ClientManager>, session_id: ringline_client_core::SessionId)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! // Place a call through the generic aggregator bearer
//! client.originate(session_id, GENERIC_BEARER_INDEX, "tel:123456789012").await?;
//!
//! // Follow it through the registry
//! for call in client.list_calls(session_id) {
//!     println!("call {}: {:?}", call.call_index, call.state);
//! }
//! # Ok(())
//! # }
//! ```

use ringline_bearer_core::{validate_target_uri, BearerIndex, CallIndex, ControlOp, SessionId};

use crate::call::CallInfo;
use crate::error::{ClientError, ClientResult};

use super::recovery::{retry_with_backoff, RetryConfig};

/// Call operations implementation for ClientManager
impl super::manager::ClientManager {
    /// Place an outgoing call to `uri` through the given bearer.
    ///
    /// The URI is validated locally (`scheme:payload` shape) before any
    /// transport I/O. `Ok(())` means the originate request was sent; the
    /// new call appears in the registry when the peer first reports it,
    /// usually in the `Dialing` state.
    ///
    /// # Errors
    ///
    /// * `ClientError::InvalidTargetUri` - the URI failed local validation
    /// * `ClientError::DiscoveryNotComplete` - discovery has not finished
    /// * `ClientError::TooManyCalls` - the per-session originate limit is hit
    /// * `ClientError::TransportSendFailed` - the send failed after retries
    pub async fn originate(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        uri: &str,
    ) -> ClientResult<()> {
        validate_target_uri(uri).map_err(|e| ClientError::invalid_target_uri(e.to_string()))?;
        self.ensure_ready(session_id).await?;

        let in_progress = self
            .calls
            .iter()
            .filter(|entry| entry.key().0 == session_id)
            .count();
        if in_progress >= self.config.max_concurrent_calls {
            return Err(ClientError::TooManyCalls {
                limit: self.config.max_concurrent_calls,
            });
        }

        tracing::info!(
            session_id = %session_id,
            bearer_index = bearer_index,
            uri = uri,
            "Placing call"
        );

        self.send_control(
            session_id,
            bearer_index,
            ControlOp::Originate {
                uri: uri.to_string(),
            },
        )
        .await
    }

    /// Accept an incoming call.
    ///
    /// # Errors
    ///
    /// Preconditions as for [`ClientManager::originate`], plus
    /// `ClientError::CallNotFound` when the index is absent from the
    /// registry (under strict call validation).
    pub async fn accept(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        call_index: CallIndex,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;
        self.ensure_call_exists(session_id, call_index)?;

        tracing::info!(session_id = %session_id, call_index = call_index, "Accepting call");
        self.send_control(session_id, bearer_index, ControlOp::Accept { call_index })
            .await
    }

    /// Put a call on hold.
    ///
    /// Confirmation is a later state update (`LocallyHeld`, or
    /// `LocallyAndRemotelyHeld` when the remote side already holds).
    pub async fn hold(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        call_index: CallIndex,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;
        self.ensure_call_exists(session_id, call_index)?;

        tracing::info!(session_id = %session_id, call_index = call_index, "Holding call");
        self.send_control(session_id, bearer_index, ControlOp::Hold { call_index })
            .await
    }

    /// Retrieve a locally held call.
    pub async fn retrieve(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        call_index: CallIndex,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;
        self.ensure_call_exists(session_id, call_index)?;

        tracing::info!(session_id = %session_id, call_index = call_index, "Retrieving call");
        self.send_control(session_id, bearer_index, ControlOp::Retrieve { call_index })
            .await
    }

    /// End a call.
    ///
    /// The registry entry survives until the peer confirms with a
    /// `Terminated` state update.
    pub async fn terminate(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        call_index: CallIndex,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;
        self.ensure_call_exists(session_id, call_index)?;

        tracing::info!(session_id = %session_id, call_index = call_index, "Terminating call");
        self.send_control(session_id, bearer_index, ControlOp::Terminate { call_index })
            .await
    }

    /// Merge two or more calls into one conversation.
    ///
    /// # Errors
    ///
    /// * `ClientError::InvalidConfiguration` - fewer than two indices given
    /// * `ClientError::CallNotFound` - an index is absent from the registry
    pub async fn join(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        call_indices: &[CallIndex],
    ) -> ClientResult<()> {
        if call_indices.len() < 2 {
            return Err(ClientError::InvalidConfiguration {
                field: "call_indices".to_string(),
                reason: "join requires at least two calls".to_string(),
            });
        }
        self.ensure_ready(session_id).await?;
        for &call_index in call_indices {
            self.ensure_call_exists(session_id, call_index)?;
        }

        tracing::info!(session_id = %session_id, calls = ?call_indices, "Joining calls");
        self.send_control(
            session_id,
            bearer_index,
            ControlOp::Join {
                call_indices: call_indices.to_vec(),
            },
        )
        .await
    }

    /// Set the signal-strength reporting interval of a bearer, in seconds.
    pub async fn set_signal_reporting_interval(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        seconds: u8,
    ) -> ClientResult<()> {
        self.ensure_ready(session_id).await?;

        tracing::info!(
            session_id = %session_id,
            bearer_index = bearer_index,
            seconds = seconds,
            "Setting signal reporting interval"
        );
        self.send_control(
            session_id,
            bearer_index,
            ControlOp::SetSignalReportingInterval { seconds },
        )
        .await
    }

    /// Get the current registry record of one call
    pub fn get_call(&self, session_id: SessionId, call_index: CallIndex) -> Option<CallInfo> {
        self.calls
            .get(&(session_id, call_index))
            .map(|entry| entry.value().clone())
    }

    /// All tracked calls of a session, ordered by call index ascending
    pub fn list_calls(&self, session_id: SessionId) -> Vec<CallInfo> {
        let mut calls: Vec<CallInfo> = self
            .calls
            .iter()
            .filter(|entry| entry.key().0 == session_id)
            .map(|entry| entry.value().clone())
            .collect();
        calls.sort_by_key(|call| call.call_index);
        calls
    }

    /// Reject operations aimed at a call the registry does not know.
    ///
    /// Under `strict_call_validation` (the default) this avoids spending a
    /// transport send on a call that is already gone; with lax validation
    /// the request goes out and the peer decides.
    pub(crate) fn ensure_call_exists(
        &self,
        session_id: SessionId,
        call_index: CallIndex,
    ) -> ClientResult<()> {
        if !self.config.strict_call_validation {
            return Ok(());
        }
        if self.calls.contains_key(&(session_id, call_index)) {
            Ok(())
        } else {
            Err(ClientError::CallNotFound {
                session_id,
                call_index,
            })
        }
    }

    /// Send one control request with the quick retry profile
    pub(crate) async fn send_control(
        &self,
        session_id: SessionId,
        bearer_index: BearerIndex,
        op: ControlOp,
    ) -> ClientResult<()> {
        let op_name = op.name();
        retry_with_backoff(op_name, RetryConfig::quick(), || {
            let op = op.clone();
            async move {
                self.transport
                    .send_control(session_id, bearer_index, op)
                    .await
                    .map_err(ClientError::from)
            }
        })
        .await
    }
}
