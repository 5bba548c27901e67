//! Configuration for the call-control client

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the call-control client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client name reported in logs
    pub client_name: String,
    /// Maximum number of concurrent calls the client will originate per session
    pub max_concurrent_calls: usize,
    /// Capacity of the broadcast event channel
    pub event_buffer_size: usize,
    /// Reject control operations whose call index is absent from the
    /// registry instead of sending them and letting the peer refuse
    pub strict_call_validation: bool,
}

impl ClientConfig {
    /// Create a new client configuration with defaults
    pub fn new() -> Self {
        Self {
            client_name: concat!("ringline-client-core/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent_calls: 4,
            event_buffer_size: 256,
            strict_call_validation: true,
        }
    }

    /// Set the client name
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    /// Set the maximum number of concurrent originated calls per session
    pub fn with_max_concurrent_calls(mut self, max_concurrent_calls: usize) -> Self {
        self.max_concurrent_calls = max_concurrent_calls;
        self
    }

    /// Set the capacity of the broadcast event channel
    pub fn with_event_buffer_size(mut self, event_buffer_size: usize) -> Self {
        self.event_buffer_size = event_buffer_size;
        self
    }

    /// Send control operations for unknown call indices instead of
    /// rejecting them locally; the peer then decides
    pub fn with_lax_call_validation(mut self) -> Self {
        self.strict_call_validation = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ClientResult<()> {
        if self.max_concurrent_calls == 0 {
            return Err(ClientError::InvalidConfiguration {
                field: "max_concurrent_calls".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.event_buffer_size == 0 {
            return Err(ClientError::InvalidConfiguration {
                field: "event_buffer_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
