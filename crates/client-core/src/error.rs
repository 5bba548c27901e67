//! Error types and handling for the client-core library
//!
//! This module defines all error types that can occur during client
//! operations and provides guidance on how to handle them.
//!
//! # Error Categories
//!
//! Errors are categorized to help with recovery strategies:
//!
//! - **Precondition Errors** - The operation was refused before any I/O;
//!   recoverable by satisfying the precondition (start the client, wait for
//!   discovery) and retrying.
//! - **Transport Errors** - The request could not leave this host;
//!   usually recoverable with retry.
//! - **Remote Errors** - The peer reported a failure asynchronously; these
//!   reach observers through the error event, never as a return value.
//! - **Configuration Errors** - Invalid settings; fix the config first.
//!
//! # Error Handling Guide
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use ringline_client_core::{ClientManager, ClientError, GENERIC_BEARER_INDEX};
//! # async fn example(client: Arc<ClientManager>, session_id: ringline_client_core::SessionId) {
//! match client.originate(session_id, GENERIC_BEARER_INDEX, "tel:123456789012").await {
//!     Ok(()) => {
//!         // The request was sent; progress arrives via the call registry feed
//!     }
//!     Err(ClientError::DiscoveryNotComplete { .. }) => {
//!         // Run discover() first and wait for its completion event
//!     }
//!     Err(ClientError::TransportSendFailed { reason }) => {
//!         eprintln!("send failed: {reason}");
//!         // Transient; retry after checking the link
//!     }
//!     Err(e) => {
//!         eprintln!("originate failed: {e}");
//!     }
//! }
//! # }
//! ```

use thiserror::Error;

use ringline_bearer_core::{CallIndex, SessionId, TransportError};

/// Result type alias for client-core operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Comprehensive error types for call-control client operations
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// Lifecycle errors
    #[error("Client is not started. Call start() before issuing operations.")]
    NotStarted,

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: SessionId },

    /// Discovery related errors
    #[error("Discovery has not completed for session {session_id}")]
    DiscoveryNotComplete { session_id: SessionId },

    #[error("Discovery is already in progress for session {session_id}")]
    DiscoveryInProgress { session_id: SessionId },

    #[error("Discovery already completed for session {session_id}")]
    DiscoveryAlreadyComplete { session_id: SessionId },

    #[error("Discovery failed with error code {code}")]
    DiscoveryFailed { code: u8 },

    /// Call related errors
    #[error("Call not found: session {session_id}, call index {call_index}")]
    CallNotFound {
        session_id: SessionId,
        call_index: CallIndex,
    },

    #[error("Invalid target URI: {reason}")]
    InvalidTargetUri { reason: String },

    #[error("Too many concurrent calls: limit is {limit}")]
    TooManyCalls { limit: usize },

    /// Transport errors
    #[error("Transport send failed: {reason}")]
    TransportSendFailed { reason: String },

    /// Asynchronously reported peer errors
    #[error("Remote reported error code {code}")]
    RemoteError { code: u8 },

    /// Configuration errors
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Generic errors
    #[error("Operation timeout after {duration_ms}ms")]
    OperationTimeout { duration_ms: u64 },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl ClientError {
    /// Create a transport send failure
    pub fn transport_send_failed(reason: impl Into<String>) -> Self {
        Self::TransportSendFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid target URI error
    pub fn invalid_target_uri(reason: impl Into<String>) -> Self {
        Self::InvalidTargetUri {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable by simply retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::TransportSendFailed { .. }
            | ClientError::OperationTimeout { .. }
            | ClientError::DiscoveryFailed { .. } => true,

            ClientError::InvalidConfiguration { .. }
            | ClientError::InvalidTargetUri { .. }
            | ClientError::InternalError { .. } => false,

            // Precondition errors recover once the precondition holds,
            // not by blind retry
            _ => false,
        }
    }

    /// Check if this error is a refused precondition (no I/O happened)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ClientError::NotStarted
                | ClientError::SessionNotFound { .. }
                | ClientError::DiscoveryNotComplete { .. }
                | ClientError::DiscoveryInProgress { .. }
                | ClientError::DiscoveryAlreadyComplete { .. }
                | ClientError::CallNotFound { .. }
                | ClientError::TooManyCalls { .. }
        )
    }

    /// Get error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::NotStarted | ClientError::SessionNotFound { .. } => "lifecycle",

            ClientError::DiscoveryNotComplete { .. }
            | ClientError::DiscoveryInProgress { .. }
            | ClientError::DiscoveryAlreadyComplete { .. }
            | ClientError::DiscoveryFailed { .. } => "discovery",

            ClientError::CallNotFound { .. }
            | ClientError::InvalidTargetUri { .. }
            | ClientError::TooManyCalls { .. } => "call",

            ClientError::TransportSendFailed { .. } => "transport",

            ClientError::RemoteError { .. } => "remote",

            ClientError::InvalidConfiguration { .. } => "configuration",

            ClientError::OperationTimeout { .. } | ClientError::InternalError { .. } => "system",
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(e: TransportError) -> Self {
        ClientError::TransportSendFailed {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_are_flagged() {
        let session_id = uuid::Uuid::new_v4();
        assert!(ClientError::NotStarted.is_precondition());
        assert!(ClientError::DiscoveryNotComplete { session_id }.is_precondition());
        assert!(ClientError::CallNotFound {
            session_id,
            call_index: 0
        }
        .is_precondition());
        assert!(!ClientError::TransportSendFailed {
            reason: "down".to_string()
        }
        .is_precondition());
    }

    #[test]
    fn transport_failures_are_recoverable() {
        let err: ClientError = TransportError::Busy.into();
        assert!(matches!(err, ClientError::TransportSendFailed { .. }));
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "transport");
    }

    #[test]
    fn categories_are_stable() {
        let session_id = uuid::Uuid::new_v4();
        assert_eq!(
            ClientError::DiscoveryFailed { code: 1 }.category(),
            "discovery"
        );
        assert_eq!(ClientError::RemoteError { code: 4 }.category(), "remote");
        assert_eq!(
            ClientError::SessionNotFound { session_id }.category(),
            "lifecycle"
        );
    }
}
